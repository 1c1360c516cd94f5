use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single therapy session note owned by one (case, author) pair.
///
/// `session_index` is `None` while the note is the in-progress draft for its
/// case; numbered sessions start at 1 and are unique per case. `updated_at`
/// is the sort key for "latest".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionNote {
    pub id: String,
    pub case_id: String,
    pub author_id: String,
    pub session_index: Option<i32>,
    pub content: String,
    pub finalized: bool,
    pub finalized_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionNote {
    /// Whether this note is still the unnumbered draft for its case.
    #[must_use]
    pub const fn is_draft(&self) -> bool {
        self.session_index.is_none()
    }
}

/// Lightweight row for the session picker, ordered by `updated_at` descending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteRef {
    pub id: String,
    pub session_index: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

/// One page of rows plus the total row count for the filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}
