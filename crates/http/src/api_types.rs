//! Request and response bodies for the HTTP API.

use casenotes_core::SessionNote;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct AuthorQuery {
    pub author_id: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub author_id: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct DraftRequest {
    pub author_id: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct NewSessionRequest {
    pub author_id: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateNoteRequest {
    pub content: String,
}

/// Outcome of a save attempt. `saved: false` means the input was blank or
/// unchanged and nothing was written.
#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub saved: bool,
    pub note: Option<SessionNote>,
}

#[derive(Debug, Deserialize)]
pub struct AttachmentRequest {
    /// "agenda" or "resource".
    pub kind: String,
    pub label: String,
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FinalizeResponse {
    pub note_id: String,
    pub finalized: bool,
    pub agenda_items_completed: usize,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: usize,
}

#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub version: &'static str,
}
