use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{digest::InvalidLength, Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::{Sha256, Sha512};
use thiserror::Error;
use uuid::Uuid;

use crate::constants::{ERR_INVALID_TOKEN, ERR_TOKEN_EXPIRED, MAGIC_LINK_SALT};

type HmacSha256 = Hmac<Sha256>;
type HmacSha512 = Hmac<Sha512>;

// =============================================================================
// Magic-Link Tokens
// =============================================================================

/// Why a magic-link token was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("{}", ERR_INVALID_TOKEN)]
    Invalid,
    #[error("{}", ERR_TOKEN_EXPIRED)]
    Expired,
}

/// Identity claims carried by a magic-link token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MagicLinkClaims {
    pub email: String,
    pub business_id: Uuid,
    /// Advisory expiry (Unix seconds); validity is decided by the signed issue time
    pub exp: i64,
}

/// Issues and verifies stateless magic-link tokens
///
/// A token is three base64url segments joined by dots:
/// `payload.issued_at.signature`, where `payload` is the JSON claims,
/// `issued_at` is the big-endian Unix timestamp of signing and
/// `signature` is HMAC-SHA256 over the first two segments.
///
/// The HMAC key is `HMAC-SHA256(secret, "magic-link")`, so tokens minted
/// for any other purpose with the same secret never verify here.
#[derive(Clone)]
pub struct MagicLinkSigner {
    mac: HmacSha256,
    ttl_secs: u64,
}

impl MagicLinkSigner {
    pub fn new(secret: &str, ttl_secs: u64) -> Result<Self, InvalidLength> {
        Self::with_salt(secret, MAGIC_LINK_SALT, ttl_secs)
    }

    fn with_salt(secret: &str, salt: &str, ttl_secs: u64) -> Result<Self, InvalidLength> {
        let mut derive = HmacSha256::new_from_slice(secret.as_bytes())?;
        derive.update(salt.as_bytes());
        let key = derive.finalize().into_bytes();

        Ok(Self {
            mac: HmacSha256::new_from_slice(&key)?,
            ttl_secs,
        })
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Issue a token for `email` / `business_id` signed at the current time
    pub fn issue(&self, email: &str, business_id: Uuid) -> String {
        self.issue_at(email, business_id, chrono::Utc::now().timestamp())
    }

    /// Issue a token as if signed at `now` (Unix seconds)
    pub fn issue_at(&self, email: &str, business_id: Uuid, now: i64) -> String {
        let claims = MagicLinkClaims {
            email: email.to_string(),
            business_id,
            exp: now.saturating_add(self.ttl()),
        };

        // Serializing a struct of strings and integers cannot fail
        let payload = serde_json::to_vec(&claims).unwrap_or_default();
        let payload = URL_SAFE_NO_PAD.encode(payload);
        let issued = URL_SAFE_NO_PAD.encode(now.to_be_bytes());

        let signing_input = format!("{payload}.{issued}");
        let signature = URL_SAFE_NO_PAD.encode(self.sign(signing_input.as_bytes()));

        format!("{signing_input}.{signature}")
    }

    /// Verify a token against the current time
    pub fn verify(&self, token: &str) -> Result<MagicLinkClaims, TokenError> {
        self.verify_at(token, chrono::Utc::now().timestamp())
    }

    /// Verify a token against `now` (Unix seconds)
    ///
    /// The signature is checked first; only an authentic token can be
    /// reported as expired.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<MagicLinkClaims, TokenError> {
        let mut parts = token.trim().split('.');
        let (Some(payload), Some(issued), Some(signature), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenError::Invalid);
        };

        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| TokenError::Invalid)?;

        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        mac.update(b".");
        mac.update(issued.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::Invalid)?;

        let issued: [u8; 8] = URL_SAFE_NO_PAD
            .decode(issued)
            .ok()
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or(TokenError::Invalid)?;
        let issued_at = i64::from_be_bytes(issued);

        let age = now.saturating_sub(issued_at);
        if age < 0 || age > self.ttl() {
            tracing::debug!("Magic-link token outside its validity window (age {}s)", age);
            return Err(TokenError::Expired);
        }

        let payload = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| TokenError::Invalid)?;
        serde_json::from_slice(&payload).map_err(|_| TokenError::Invalid)
    }

    /// TTL as a signed offset; values past `i64::MAX` saturate
    fn ttl(&self) -> i64 {
        i64::try_from(self.ttl_secs).unwrap_or(i64::MAX)
    }

    fn sign(&self, data: &[u8]) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(data);
        mac.finalize().into_bytes().to_vec()
    }
}

// =============================================================================
// Webhook Signatures
// =============================================================================

/// Verify a Paystack webhook signature
///
/// Paystack sends `x-paystack-signature: hex(HMAC-SHA512(secret_key, raw_body))`.
/// Comparison happens inside `verify_slice`, which is constant-time.
pub fn verify_paystack_signature(body: &[u8], signature: &str, secret: &str) -> bool {
    let mut mac = match HmacSha512::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            tracing::error!("Failed to create HMAC instance");
            return false;
        }
    };

    mac.update(body);

    let sig_bytes = match hex::decode(signature.trim()) {
        Ok(bytes) => bytes,
        Err(_) => {
            tracing::warn!("Invalid hex webhook signature format");
            return false;
        }
    };

    mac.verify_slice(&sig_bytes).is_ok()
}
