use uuid::Uuid;

use crate::db::{self, businesses};
use crate::email::magic_link_email;
use crate::error::{AppError, Result};
use crate::security::{MagicLinkClaims, MagicLinkSigner};
use crate::AppState;

/// Link the owner follows to edit their page
pub fn magic_link_url(frontend_url: &str, business_id: Uuid, token: &str) -> String {
    format!("{frontend_url}/dashboard/{business_id}?token={token}")
}

/// Email a magic link to the owner of `business_id`
///
/// Nothing is written, so a delivery failure needs no cleanup; it is
/// reported to the caller with the provider's error attached.
pub async fn request_magic_link(state: &AppState, business_id: Uuid, email: &str) -> Result<()> {
    let business = db::run(&state.db, move |db| businesses::get(db, business_id))
        .await?
        .ok_or(AppError::BusinessNotFound)?;

    if !business.email_matches(email) {
        tracing::warn!("Magic link requested with mismatched email for business {}", business_id);
        return Err(AppError::EmailMismatch);
    }

    let token = state.signer.issue(email, business_id);
    let link = magic_link_url(&state.config.frontend_url, business_id, &token);

    state
        .mailer
        .send(magic_link_email(email, &business.name, &link))
        .await
        .map_err(AppError::MagicLinkDelivery)?;

    tracing::info!("Magic link sent for business {}", business_id);

    Ok(())
}

pub fn verify_token(signer: &MagicLinkSigner, token: &str) -> Result<MagicLinkClaims> {
    signer.verify(token).map_err(|e| {
        tracing::warn!("Magic-link token rejected: {}", e);
        AppError::Token(e)
    })
}
