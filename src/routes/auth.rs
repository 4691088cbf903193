use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::validation::ValidatedJson;
use crate::error::Result;
use crate::services::auth;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct MagicLinkRequest {
    pub business_id: Uuid,
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct MagicLinkResponse {
    pub status: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyTokenRequest {
    #[validate(length(min = 1))]
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub business_id: Uuid,
    pub email: String,
    pub exp: i64,
}

/// Email an edit link to the registered owner of a business
pub async fn request_magic_link(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<MagicLinkRequest>,
) -> Result<Json<MagicLinkResponse>> {
    auth::request_magic_link(&state, payload.business_id, &payload.email).await?;

    Ok(Json(MagicLinkResponse {
        status: "success",
        message: "Magic link sent to your email",
    }))
}

pub async fn verify_token(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<VerifyTokenRequest>,
) -> Result<Json<TokenResponse>> {
    let claims = auth::verify_token(&state.signer, &payload.token)?;

    Ok(Json(TokenResponse {
        business_id: claims.business_id,
        email: claims.email,
        exp: claims.exp,
    }))
}
