use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::email::MailError;
use crate::paystack::GatewayError;
use crate::security::TokenError;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] redb::Error),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::error::EncodeError),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] bincode::error::DecodeError),

    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Business not found")]
    BusinessNotFound,

    #[error("Page not found")]
    PageNotFound,

    #[error("Analytics not found")]
    AnalyticsNotFound,

    #[error("Page already exists for this business")]
    PageAlreadyExists,

    #[error("Email does not match business owner")]
    EmailMismatch,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Payment was not successful")]
    PaymentNotSuccessful,

    #[error("Invalid webhook signature")]
    InvalidWebhookSignature,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to send magic link: {0}")]
    MagicLinkDelivery(#[source] MailError),

    #[error("Payment initialization failed: {0}")]
    PaymentInitialization(#[source] GatewayError),

    #[error("Payment verification failed: {0}")]
    PaymentVerification(#[source] GatewayError),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::InvalidInput(errors.to_string())
    }
}

/// Implement IntoResponse to convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Database(_)
            | AppError::Transaction(_)
            | AppError::Table(_)
            | AppError::Storage(_)
            | AppError::Commit(_)
            | AppError::Serialization(_)
            | AppError::Deserialization(_)
            | AppError::TaskJoin(_) => {
                tracing::error!("Storage failure: {:?}", self);
                return error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
            }
            AppError::MagicLinkDelivery(_)
            | AppError::PaymentInitialization(_)
            | AppError::PaymentVerification(_) => {
                tracing::error!("Upstream failure: {}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::BusinessNotFound | AppError::PageNotFound | AppError::AnalyticsNotFound => {
                StatusCode::NOT_FOUND
            }
            AppError::PageAlreadyExists => StatusCode::CONFLICT,
            AppError::EmailMismatch => StatusCode::FORBIDDEN,
            AppError::Token(_) | AppError::InvalidWebhookSignature => StatusCode::UNAUTHORIZED,
            AppError::PaymentNotSuccessful | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        };

        error_body(status, &self.to_string())
    }
}

// `detail` mirrors `error` for the web frontend, which reads that key
fn error_body(status: StatusCode, message: &str) -> Response {
    let body = Json(json!({
        "error": message,
        "detail": message,
    }));

    (status, body).into_response()
}

/// Result type alias for application results
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::BusinessNotFound, StatusCode::NOT_FOUND),
            (AppError::AnalyticsNotFound, StatusCode::NOT_FOUND),
            (AppError::PageAlreadyExists, StatusCode::CONFLICT),
            (AppError::EmailMismatch, StatusCode::FORBIDDEN),
            (AppError::Token(TokenError::Expired), StatusCode::UNAUTHORIZED),
            (AppError::PaymentNotSuccessful, StatusCode::BAD_REQUEST),
            (
                AppError::MagicLinkDelivery(MailError::Rejected("quota".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_upstream_cause_is_attached() {
        let err = AppError::MagicLinkDelivery(MailError::Rejected("domain not verified".into()));
        assert!(err.to_string().starts_with("Failed to send magic link"));
        assert!(err.to_string().contains("domain not verified"));
    }

    #[test]
    fn test_token_messages() {
        assert_eq!(AppError::Token(TokenError::Invalid).to_string(), "Invalid token");
        assert_eq!(AppError::Token(TokenError::Expired).to_string(), "Token has expired");
    }
}
