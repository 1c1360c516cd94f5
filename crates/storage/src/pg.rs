//! PostgreSQL storage backend using sqlx.
//!
//! Split into modular files by domain concern.

mod attachments;
mod notes;
mod phases;

use casenotes_core::{
    AttachmentKind, NoteAttachment, NoteRef, SessionNote, TreatmentPhase,
    PG_POOL_ACQUIRE_TIMEOUT_SECS, PG_POOL_IDLE_TIMEOUT_SECS, PG_POOL_MAX_CONNECTIONS,
};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

use crate::error::StorageError;
use crate::migrations::run_migrations;

#[derive(Clone, Debug)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(PG_POOL_MAX_CONNECTIONS)
            .acquire_timeout(std::time::Duration::from_secs(PG_POOL_ACQUIRE_TIMEOUT_SECS))
            .idle_timeout(std::time::Duration::from_secs(PG_POOL_IDLE_TIMEOUT_SECS))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;
        run_migrations(&pool).await?;
        tracing::info!("PgStorage initialized");
        Ok(Self { pool })
    }

    /// Wrap an existing pool (the pool owner runs migrations itself).
    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

pub(crate) fn row_to_note(row: &sqlx::postgres::PgRow) -> Result<SessionNote, StorageError> {
    let finalized_at: Option<DateTime<Utc>> = row.try_get("finalized_at")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;
    Ok(SessionNote {
        id: row.try_get("id")?,
        case_id: row.try_get("case_id")?,
        author_id: row.try_get("author_id")?,
        session_index: row.try_get("session_index")?,
        content: row.try_get("content")?,
        finalized: row.try_get("finalized")?,
        finalized_at,
        created_at,
        updated_at,
    })
}

pub(crate) fn row_to_note_ref(row: &sqlx::postgres::PgRow) -> Result<NoteRef, StorageError> {
    Ok(NoteRef {
        id: row.try_get("id")?,
        session_index: row.try_get("session_index")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub(crate) fn row_to_phase(row: &sqlx::postgres::PgRow) -> Result<TreatmentPhase, StorageError> {
    let planned_on: Option<NaiveDate> = row.try_get("planned_on")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    Ok(TreatmentPhase {
        id: row.try_get("id")?,
        case_id: row.try_get("case_id")?,
        label: row.try_get("label")?,
        planned_on,
        session_index: row.try_get("session_index")?,
        created_at,
    })
}

pub(crate) fn row_to_attachment(
    row: &sqlx::postgres::PgRow,
) -> Result<NoteAttachment, StorageError> {
    let kind_str: String = row.try_get("kind")?;
    let kind = kind_str.parse::<AttachmentKind>().unwrap_or_else(|_| {
        tracing::warn!(invalid_kind = %kind_str, "corrupt attachment kind in DB, defaulting to Resource");
        AttachmentKind::Resource
    });
    Ok(NoteAttachment {
        id: row.try_get("id")?,
        note_id: row.try_get("note_id")?,
        kind,
        label: row.try_get("label")?,
        url: row.try_get("url")?,
        done: row.try_get("done")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Convert `usize` to `i64` for SQL LIMIT/OFFSET binds.
pub(crate) fn usize_to_i64(val: usize) -> i64 {
    i64::try_from(val).unwrap_or(i64::MAX)
}

pub(crate) const NOTE_COLUMNS: &str =
    "id, case_id, author_id, session_index, content, finalized, finalized_at,
     created_at, updated_at";

pub(crate) const PHASE_COLUMNS: &str =
    "id, case_id, label, planned_on, session_index, created_at";

pub(crate) const ATTACHMENT_COLUMNS: &str =
    "id, note_id, kind, label, url, done, created_at";
