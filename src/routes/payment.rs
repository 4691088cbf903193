use axum::{
    body::Bytes,
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::validation::{is_valid_reference, ValidatedJson};
use crate::constants::PAYSTACK_SIGNATURE_HEADER;
use crate::error::{AppError, Result};
use crate::paystack::Authorization;
use crate::services::payment::{self, VerifiedPayment};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct InitializePaymentRequest {
    pub business_id: Uuid,
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub status: &'static str,
}

pub async fn initialize_payment(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<InitializePaymentRequest>,
) -> Result<Json<Authorization>> {
    let authorization = payment::initialize(&state, payload.business_id, &payload.email).await?;
    Ok(Json(authorization))
}

/// Confirm a charge by its gateway reference
///
/// A charge the gateway reports as unsuccessful is a 400; the business
/// is marked failed first when its id can be resolved.
pub async fn verify_payment(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<Json<VerifiedPayment>> {
    if !is_valid_reference(&reference) {
        tracing::warn!("Rejected malformed payment reference");
        return Err(AppError::InvalidInput("Invalid payment reference".to_string()));
    }

    let verified = payment::verify(&state, &reference).await?;
    Ok(Json(verified))
}

/// Gateway push notification
///
/// Takes the raw body so the signature is checked over the exact bytes sent.
pub async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>> {
    let signature = headers
        .get(PAYSTACK_SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    payment::handle_webhook(&state, signature, &body).await?;

    Ok(Json(WebhookAck { status: "success" }))
}
