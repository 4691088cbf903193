use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// JSON body that has passed its `validator` rules
///
/// Malformed JSON and failed validation both become a 400 before the
/// handler runs.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate().map_err(|errors| {
            tracing::warn!("Request failed validation: {}", errors);
            AppError::from(errors)
        })?;
        Ok(ValidatedJson(value))
    }
}

/// Validate gateway reference format before it is placed in an outbound URL
pub fn is_valid_reference(reference: &str) -> bool {
    !reference.is_empty()
        && reference.len() <= 100
        && reference
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '='))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_reference() {
        assert!(is_valid_reference("T123456789"));
        assert!(is_valid_reference("ref_abc-1.2="));

        assert!(!is_valid_reference(""));
        assert!(!is_valid_reference("../admin"));
        assert!(!is_valid_reference("ref?x=1"));
        assert!(!is_valid_reference(&"a".repeat(101)));
    }
}
