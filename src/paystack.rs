//! Paystack integration via REST API (no SDK dependency)
//!
//! Every call is a single attempt bounded by the client timeout. Nothing is
//! retried: a retried initialize could create a second charge.

use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::models::null_as_default;

const PAYSTACK_API_BASE: &str = "https://api.paystack.co";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("gateway returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("gateway rejected the request: {0}")]
    Rejected(String),
}

/// A charge to create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeRequest {
    pub email: String,
    /// Amount in the lowest currency unit
    pub amount: u64,
    pub business_id: Uuid,
    pub callback_url: String,
}

/// Where to send the payer to complete a charge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authorization {
    pub authorization_url: String,
    pub access_code: String,
    pub reference: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Customer {
    #[serde(default)]
    pub customer_code: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// A charge as reported by the gateway
///
/// Used both for verify responses and for `charge.success` webhook data.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Transaction {
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub amount: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reference: String,
    /// Object, empty string or null depending on how the charge was created
    #[serde(default)]
    pub metadata: Value,
    #[serde(default)]
    pub customer: Option<Customer>,
}

impl Transaction {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    /// Business the charge was created for, read from its metadata
    pub fn business_id(&self) -> Option<Uuid> {
        let direct = self.metadata.get("business_id").and_then(Value::as_str);

        let custom_field = || {
            self.metadata
                .get("custom_fields")?
                .as_array()?
                .iter()
                .find(|field| field["variable_name"] == "business_id")?
                .get("value")?
                .as_str()
        };

        direct
            .or_else(custom_field)
            .and_then(|raw| Uuid::parse_str(raw).ok())
    }

    pub fn customer_code(&self) -> Option<String> {
        self.customer.as_ref()?.customer_code.clone()
    }

    pub fn customer_email(&self) -> String {
        self.customer
            .as_ref()
            .and_then(|c| c.email.clone())
            .unwrap_or_default()
    }
}

/// Push notification from the gateway
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

/// Standard Paystack response envelope
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    status: bool,
    #[serde(default)]
    message: String,
    data: Option<T>,
}

/// Remote payment processor
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn initialize(&self, charge: ChargeRequest) -> Result<Authorization, GatewayError>;

    async fn verify(&self, reference: &str) -> Result<Transaction, GatewayError>;
}

pub struct PaystackClient {
    client: reqwest::Client,
    secret_key: String,
    base_url: String,
}

impl PaystackClient {
    pub fn new(secret_key: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            secret_key: secret_key.to_string(),
            base_url: PAYSTACK_API_BASE.to_string(),
        })
    }

    /// Make authenticated request to Paystack and unwrap the envelope
    async fn paystack_request<T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        endpoint: &str,
        body: Option<Value>,
    ) -> Result<T, GatewayError> {
        let url = format!("{}{endpoint}", self.base_url);

        let mut request = self
            .client
            .request(method, &url)
            .bearer_auth(&self.secret_key);

        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!(error = %e, "Paystack API request failed");
            GatewayError::Transport(e)
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status, body = %body, "Paystack API error");
            return Err(GatewayError::Status { status, body });
        }

        let envelope: Envelope<T> = response.json().await?;
        match envelope {
            Envelope {
                status: true,
                data: Some(data),
                ..
            } => Ok(data),
            Envelope { message, .. } => Err(GatewayError::Rejected(message)),
        }
    }
}

#[async_trait]
impl PaymentGateway for PaystackClient {
    async fn initialize(&self, charge: ChargeRequest) -> Result<Authorization, GatewayError> {
        let business_id = charge.business_id.to_string();
        tracing::debug!(business_id = %business_id, amount = charge.amount, "Initializing charge");

        let body = json!({
            "email": charge.email,
            "amount": charge.amount,
            "callback_url": charge.callback_url,
            "metadata": {
                "business_id": business_id,
                "custom_fields": [{
                    "display_name": "Business ID",
                    "variable_name": "business_id",
                    "value": business_id,
                }],
            },
        });

        self.paystack_request(reqwest::Method::POST, "/transaction/initialize", Some(body))
            .await
    }

    async fn verify(&self, reference: &str) -> Result<Transaction, GatewayError> {
        tracing::debug!(reference = %reference, "Verifying charge");

        self.paystack_request(
            reqwest::Method::GET,
            &format!("/transaction/verify/{reference}"),
            None,
        )
        .await
    }
}
