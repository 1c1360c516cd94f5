//! Typed error enum for the storage layer.
//!
//! Callers match on specific failure modes — missing rows, unique-index
//! collisions, transient database trouble — instead of downcasting opaque
//! boxes. The session-index collision on racing "new session" requests
//! arrives here as `Duplicate`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// Row not found for an entity the caller expected to exist.
    #[error("not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    /// Unique constraint violation (draft upsert race, session-index collision).
    #[error("duplicate: {0}")]
    Duplicate(String),

    /// SQL / connection / timeout failure.
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    /// Migration failure.
    #[error("migration error: {0}")]
    Migration(String),
}

impl StorageError {
    /// Whether this error is likely transient (worth retrying later).
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Database(sqlx::Error::PoolTimedOut | sqlx::Error::Io(_)))
    }

    /// Whether this error is a unique-constraint violation.
    #[must_use]
    pub const fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate(_))
    }
}

/// Custom `From<sqlx::Error>` — NOT blanket `#[from]`.
///
/// - `RowNotFound` → `NotFound` (generic; callers remap with entity context)
/// - SQLSTATE 23505 → `Duplicate`
/// - Everything else → `Database`
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound { entity: "row", id: "unknown".into() },
            sqlx::Error::Database(db_err) if db_err.code().is_some_and(|c| c == "23505") => {
                Self::Duplicate(db_err.message().to_owned())
            },
            _ => Self::Database(err),
        }
    }
}
