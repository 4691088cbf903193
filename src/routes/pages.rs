use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use super::validation::ValidatedJson;
use crate::db::{self, pages};
use crate::error::{AppError, Result};
use crate::models::{NewPage, Page, PageUpdate};
use crate::AppState;

/// Create the holiday hours page for a business
///
/// The page reuses the business id and gets an empty analytics record.
pub async fn create_page(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<NewPage>,
) -> Result<(StatusCode, Json<Page>)> {
    let now = Utc::now().timestamp();
    let (id, record) = db::run(&state.db, move |db| pages::create(db, payload, now)).await?;

    tracing::info!("Page {} created", id);

    Ok((StatusCode::CREATED, Json(Page::from_record(id, record))))
}

pub async fn get_page(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Page>> {
    let record = db::run(&state.db, move |db| pages::get(db, id))
        .await?
        .ok_or(AppError::PageNotFound)?;

    Ok(Json(Page::from_record(id, record)))
}

/// Look up the page owned by `business_id`
pub async fn get_page_by_business(
    State(state): State<AppState>,
    Path(business_id): Path<Uuid>,
) -> Result<Json<Page>> {
    // Pages are keyed by their owning business
    get_page(State(state), Path(business_id)).await
}

pub async fn update_page(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<PageUpdate>,
) -> Result<Json<Page>> {
    let now = Utc::now().timestamp();
    let record = db::run(&state.db, move |db| pages::update(db, id, payload, now)).await?;

    tracing::info!("Page {} updated", id);

    Ok(Json(Page::from_record(id, record)))
}
