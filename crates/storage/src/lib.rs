//! Storage layer for casenotes
//!
//! PostgreSQL-backed persistence for session notes, treatment phases and
//! note attachments, behind async domain traits. Uniqueness of
//! (case, session_index) and of the per-(case, author) draft row is
//! enforced with partial unique indexes and upsert conflict targets.

mod error;
mod migrations;
mod pg;
pub mod traits;

pub use error::StorageError;
pub use migrations::run_migrations;
pub use pg::PgStorage;
pub use traits::{AttachmentStore, NoteStore, PhaseStore, PracticeStore};
