//! Agenda and resource attachments on notes.

use axum::extract::{Path, State};
use axum::Json;
use std::sync::Arc;

use casenotes_core::{AttachmentKind, NoteAttachment};
use casenotes_storage::{AttachmentStore, NoteStore};
use chrono::Utc;

use crate::api_error::ApiError;
use crate::api_types::AttachmentRequest;
use crate::AppState;

pub async fn list_attachments(
    State(state): State<Arc<AppState>>,
    Path(note_id): Path<String>,
) -> Result<Json<Vec<NoteAttachment>>, ApiError> {
    let attachments = state.store.attachments_for_note(&note_id).await?;
    Ok(Json(attachments))
}

pub async fn add_attachment(
    State(state): State<Arc<AppState>>,
    Path(note_id): Path<String>,
    Json(req): Json<AttachmentRequest>,
) -> Result<Json<NoteAttachment>, ApiError> {
    let kind: AttachmentKind =
        req.kind.parse().map_err(|_| ApiError::BadRequest(format!("unknown kind '{}'", req.kind)))?;
    let label = req.label.trim();
    if label.is_empty() {
        return Err(ApiError::BadRequest("attachment label is required".to_owned()));
    }
    state
        .store
        .load_by_id(&note_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("session_note '{note_id}' not found")))?;

    let attachment = NoteAttachment {
        id: uuid::Uuid::new_v4().to_string(),
        note_id,
        kind,
        label: label.to_owned(),
        url: req.url,
        done: false,
        created_at: Utc::now(),
    };
    state.store.add_attachment(&attachment).await?;
    Ok(Json(attachment))
}
