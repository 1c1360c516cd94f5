//! Storage trait abstraction
//!
//! Async domain traits over the note store. Services hold an
//! `Arc<dyn PracticeStore>`, so tests can substitute an in-memory
//! implementation for the PostgreSQL one.

use async_trait::async_trait;
use casenotes_core::{NoteAttachment, NoteRef, Paginated, SessionNote, TreatmentPhase};

use crate::error::StorageError;

type Result<T> = std::result::Result<T, StorageError>;

/// CRUD operations on session notes.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Most recently updated note for a (case, author), draft or numbered.
    /// `None` when the case has no notes yet — an empty editor, not an error.
    async fn load_latest(&self, case_id: &str, author_id: &str) -> Result<Option<SessionNote>>;

    /// Point lookup, used when a prior session is picked from history.
    async fn load_by_id(&self, id: &str) -> Result<Option<SessionNote>>;

    /// Session-picker rows, `updated_at` descending, capped at `limit`.
    async fn load_history(
        &self,
        case_id: &str,
        author_id: &str,
        limit: usize,
    ) -> Result<Vec<NoteRef>>;

    /// Insert or update the single draft row for (case, author).
    /// Always stamps `updated_at`. Returns the persisted row.
    async fn upsert_draft(
        &self,
        case_id: &str,
        author_id: &str,
        content: &str,
    ) -> Result<SessionNote>;

    /// Targeted content update of an existing note. Stamps `updated_at`.
    /// `NotFound` when no row matches.
    async fn update_content(&self, id: &str, content: &str) -> Result<()>;

    /// Create the next numbered session for a case: `max(session_index) + 1`,
    /// starting at 1, with empty content. A losing race against a concurrent
    /// create returns `Duplicate`; the caller surfaces it, no silent retry.
    async fn create_numbered(&self, case_id: &str, author_id: &str) -> Result<SessionNote>;

    /// Stamp a note as finalized. Advisory: content stays writable.
    async fn finalize(&self, id: &str) -> Result<()>;

    /// All notes for a case, `updated_at` descending (timeline overview).
    async fn notes_for_case(&self, case_id: &str) -> Result<Vec<SessionNote>>;

    /// One page of notes matching an exact session index (`None` matches the
    /// unnumbered "misc" bucket), newest first.
    async fn notes_by_index(
        &self,
        case_id: &str,
        session_index: Option<i32>,
        offset: usize,
        limit: usize,
    ) -> Result<Paginated<SessionNote>>;
}

/// Read access to planned treatment phases.
#[async_trait]
pub trait PhaseStore: Send + Sync {
    /// All phases for a case, session index ascending.
    async fn phases_for_case(&self, case_id: &str) -> Result<Vec<TreatmentPhase>>;

    /// Save or replace a phase (seed data and tooling).
    async fn save_phase(&self, phase: &TreatmentPhase) -> Result<()>;
}

/// Agenda/resource references appended to notes.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Append an attachment to a note.
    async fn add_attachment(&self, attachment: &NoteAttachment) -> Result<()>;

    /// Attachments for a note, oldest first.
    async fn attachments_for_note(&self, note_id: &str) -> Result<Vec<NoteAttachment>>;

    /// Mark a note's open agenda items done. Returns how many were updated.
    async fn complete_agenda_items(&self, note_id: &str) -> Result<usize>;
}

/// Everything the service layer needs from one handle.
pub trait PracticeStore: NoteStore + PhaseStore + AttachmentStore {}

impl<T: NoteStore + PhaseStore + AttachmentStore> PracticeStore for T {}
