//! Note lifecycle handlers: drafts, numbered sessions, finalization.

use axum::extract::{Path, Query, State};
use axum::Json;
use std::sync::Arc;

use casenotes_core::{NoteRef, SessionNote, HISTORY_PAGE_SIZE};
use casenotes_storage::{AttachmentStore, NoteStore};

use crate::api_error::ApiError;
use crate::api_types::{
    AuthorQuery, DraftRequest, FinalizeResponse, HistoryQuery, NewSessionRequest, SaveResponse,
    UpdateNoteRequest,
};
use crate::AppState;

pub async fn latest_note(
    State(state): State<Arc<AppState>>,
    Path(case_id): Path<String>,
    Query(query): Query<AuthorQuery>,
) -> Result<Json<Option<SessionNote>>, ApiError> {
    let note = state.store.load_latest(&case_id, &query.author_id).await?;
    Ok(Json(note))
}

pub async fn note_history(
    State(state): State<Arc<AppState>>,
    Path(case_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<NoteRef>>, ApiError> {
    let limit = query.limit.unwrap_or(HISTORY_PAGE_SIZE).min(HISTORY_PAGE_SIZE);
    let refs = state.store.load_history(&case_id, &query.author_id, limit).await?;
    Ok(Json(refs))
}

/// Upsert the draft for (case, author). Blank content is acknowledged but
/// never written, so an empty editor cannot clobber stored text.
pub async fn save_draft(
    State(state): State<Arc<AppState>>,
    Path(case_id): Path<String>,
    Json(req): Json<DraftRequest>,
) -> Result<Json<SaveResponse>, ApiError> {
    if req.content.trim().is_empty() {
        return Ok(Json(SaveResponse { saved: false, note: None }));
    }
    let note = state.store.upsert_draft(&case_id, &req.author_id, &req.content).await?;
    tracing::debug!(note_id = %note.id, content_len = req.content.len(), "draft saved");
    Ok(Json(SaveResponse { saved: true, note: Some(note) }))
}

/// Start the next numbered session for a case. A losing race against a
/// concurrent create surfaces as 422.
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    Path(case_id): Path<String>,
    Json(req): Json<NewSessionRequest>,
) -> Result<Json<SessionNote>, ApiError> {
    let note = state.store.create_numbered(&case_id, &req.author_id).await?;
    tracing::info!(note_id = %note.id, session_index = ?note.session_index, "session started");
    Ok(Json(note))
}

pub async fn get_note(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionNote>, ApiError> {
    let note = state
        .store
        .load_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("session_note '{id}' not found")))?;
    Ok(Json(note))
}

pub async fn update_note(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateNoteRequest>,
) -> Result<Json<SaveResponse>, ApiError> {
    if req.content.trim().is_empty() {
        return Ok(Json(SaveResponse { saved: false, note: None }));
    }
    state.store.update_content(&id, &req.content).await?;
    let note = state.store.load_by_id(&id).await?;
    Ok(Json(SaveResponse { saved: true, note }))
}

/// Stamp a note finalized and mark its open agenda items done. Advisory:
/// the content stays editable afterwards.
pub async fn finalize_note(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<FinalizeResponse>, ApiError> {
    state.store.finalize(&id).await?;
    let completed = state.store.complete_agenda_items(&id).await?;
    tracing::info!(note_id = %id, agenda_items = completed, "note finalized");
    Ok(Json(FinalizeResponse { note_id: id, finalized: true, agenda_items_completed: completed }))
}
