use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::DEFAULT_VIEW_SOURCE;
use crate::db::{self, analytics};
use crate::error::{AppError, Result};
use crate::models::Analytics;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ViewRequest {
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ViewResponse {
    pub status: &'static str,
    pub views: u64,
}

pub async fn get_analytics(
    State(state): State<AppState>,
    Path(page_id): Path<Uuid>,
) -> Result<Json<Analytics>> {
    let record = db::run(&state.db, move |db| analytics::get(db, page_id))
        .await?
        .ok_or(AppError::AnalyticsNotFound)?;

    Ok(Json(Analytics::from_record(page_id, record)))
}

/// Count a page view
///
/// The body is optional; without a `source` the view counts as "direct".
pub async fn record_view(
    State(state): State<AppState>,
    Path(page_id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<ViewResponse>> {
    let request: ViewRequest = if body.iter().all(u8::is_ascii_whitespace) {
        ViewRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::InvalidInput(format!("Invalid view payload: {e}")))?
    };

    let source = request
        .source
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_VIEW_SOURCE.to_string());

    let record = db::run(&state.db, move |db| {
        analytics::record_view(db, page_id, &source, Utc::now())
    })
    .await?;

    tracing::debug!("View recorded for page {} (total {})", page_id, record.views);

    Ok(Json(ViewResponse {
        status: "success",
        views: record.views,
    }))
}
