//! Case timeline handlers: overview and the deep session reader.

use axum::extract::{Path, Query, State};
use axum::Json;
use std::sync::Arc;

use casenotes_service::{SessionPage, TimelineOverview};

use crate::api_error::ApiError;
use crate::api_types::PageQuery;
use crate::AppState;

pub async fn timeline_overview(
    State(state): State<Arc<AppState>>,
    Path(case_id): Path<String>,
) -> Result<Json<TimelineOverview>, ApiError> {
    let overview = state.timeline.overview(&case_id).await?;
    Ok(Json(overview))
}

pub async fn session_page(
    State(state): State<Arc<AppState>>,
    Path((case_id, index)): Path<(String, String)>,
    Query(query): Query<PageQuery>,
) -> Result<Json<SessionPage>, ApiError> {
    let session_index = parse_index(&index)?;
    let page = state.timeline.session_page(&case_id, session_index, query.page).await?;
    Ok(Json(page))
}

/// Path segment for the reader: a session number, or "misc" for the
/// unnumbered bucket.
fn parse_index(raw: &str) -> Result<Option<i32>, ApiError> {
    if raw == "misc" {
        return Ok(None);
    }
    raw.parse::<i32>()
        .map(Some)
        .map_err(|_| ApiError::BadRequest(format!("invalid session index '{raw}'")))
}
