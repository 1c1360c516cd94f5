//! PostgreSQL schema migrations for casenotes storage.

use sqlx::PgPool;

use crate::error::StorageError;

/// Run all PostgreSQL migrations.
///
/// Idempotent; safe to run on every startup.
pub async fn run_migrations(pool: &PgPool) -> Result<(), StorageError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS session_notes (
            id TEXT PRIMARY KEY,
            case_id TEXT NOT NULL,
            author_id TEXT NOT NULL,
            session_index INTEGER,
            content TEXT NOT NULL DEFAULT '',
            finalized BOOLEAN NOT NULL DEFAULT FALSE,
            finalized_at TIMESTAMPTZ,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // One row per (case, session_index) for numbered sessions; the upsert
    // conflict target for racing "new session" inserts.
    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_notes_case_session
         ON session_notes (case_id, session_index) WHERE session_index IS NOT NULL",
    )
    .execute(pool)
    .await?;

    // One draft per (case, author); the conflict target for draft autosaves.
    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_notes_draft
         ON session_notes (case_id, author_id) WHERE session_index IS NULL",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_notes_case_updated
         ON session_notes (case_id, updated_at DESC)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS treatment_phases (
            id TEXT PRIMARY KEY,
            case_id TEXT NOT NULL,
            label TEXT NOT NULL,
            planned_on DATE,
            session_index INTEGER NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_phases_case
         ON treatment_phases (case_id, session_index)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS note_attachments (
            id TEXT PRIMARY KEY,
            note_id TEXT NOT NULL REFERENCES session_notes (id),
            kind TEXT NOT NULL,
            label TEXT NOT NULL,
            url TEXT,
            done BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_attach_note ON note_attachments (note_id)")
        .execute(pool)
        .await?;

    tracing::info!("casenotes migrations applied");
    Ok(())
}
