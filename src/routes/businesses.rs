use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use super::validation::ValidatedJson;
use crate::db::{self, businesses};
use crate::error::{AppError, Result};
use crate::models::{Business, BusinessRecord, BusinessUpdate, NewBusiness};
use crate::AppState;

/// Sign up a business
///
/// Every new business starts with `payment_status = pending`.
pub async fn create_business(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<NewBusiness>,
) -> Result<(StatusCode, Json<Business>)> {
    let id = Uuid::new_v4();
    let record = BusinessRecord::new(payload, Utc::now().timestamp());

    let stored = record.clone();
    db::run(&state.db, move |db| businesses::insert(db, id, &stored)).await?;

    tracing::info!("Business {} created", id);

    Ok((StatusCode::CREATED, Json(Business::from_record(id, record))))
}

pub async fn get_business(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Business>> {
    let record = db::run(&state.db, move |db| businesses::get(db, id))
        .await?
        .ok_or(AppError::BusinessNotFound)?;

    Ok(Json(Business::from_record(id, record)))
}

/// Partially update a business; fields missing from the body are untouched
pub async fn update_business(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<BusinessUpdate>,
) -> Result<Json<Business>> {
    let now = Utc::now().timestamp();
    let record = db::run(&state.db, move |db| {
        businesses::modify(db, id, |record| record.apply(payload, now))
    })
    .await?
    .ok_or(AppError::BusinessNotFound)?;

    tracing::info!("Business {} updated", id);

    Ok(Json(Business::from_record(id, record)))
}

/// Delete a business along with its page and analytics
pub async fn delete_business(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    db::run(&state.db, move |db| businesses::delete(db, id)).await?;

    tracing::info!("Business {} deleted", id);

    Ok(StatusCode::NO_CONTENT)
}
