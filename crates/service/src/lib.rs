//! Business logic layer for casenotes.
//!
//! `NoteEditor` owns the per-(case, author) editing workspace: dirty
//! tracking, debounced autosave, session versioning and finalize.
//! `TimelineService` builds the read-only plan-vs-reality view with the
//! digest fallback chain.

mod editor;
mod error;
mod timeline;
#[cfg(test)]
mod tests;

pub use editor::NoteEditor;
pub use error::ServiceError;
pub use timeline::{PhaseCard, SessionPage, TimelineOverview, TimelineService};
