//! NoteStore implementation for PgStorage.

use super::*;

use crate::traits::NoteStore;
use async_trait::async_trait;
use casenotes_core::Paginated;

#[async_trait]
impl NoteStore for PgStorage {
    async fn load_latest(
        &self,
        case_id: &str,
        author_id: &str,
    ) -> Result<Option<SessionNote>, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {NOTE_COLUMNS} FROM session_notes
             WHERE case_id = $1 AND author_id = $2
             ORDER BY updated_at DESC LIMIT 1"
        ))
        .bind(case_id)
        .bind(author_id)
        .fetch_optional(self.pool())
        .await?;
        row.map(|r| row_to_note(&r)).transpose()
    }

    async fn load_by_id(&self, id: &str) -> Result<Option<SessionNote>, StorageError> {
        let row = sqlx::query(&format!("SELECT {NOTE_COLUMNS} FROM session_notes WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        row.map(|r| row_to_note(&r)).transpose()
    }

    async fn load_history(
        &self,
        case_id: &str,
        author_id: &str,
        limit: usize,
    ) -> Result<Vec<NoteRef>, StorageError> {
        let rows = sqlx::query(
            "SELECT id, session_index, updated_at FROM session_notes
             WHERE case_id = $1 AND author_id = $2
             ORDER BY updated_at DESC LIMIT $3",
        )
        .bind(case_id)
        .bind(author_id)
        .bind(usize_to_i64(limit))
        .fetch_all(self.pool())
        .await?;
        rows.iter().map(row_to_note_ref).collect()
    }

    async fn upsert_draft(
        &self,
        case_id: &str,
        author_id: &str,
        content: &str,
    ) -> Result<SessionNote, StorageError> {
        let row = sqlx::query(&format!(
            "INSERT INTO session_notes (id, case_id, author_id, session_index, content)
             VALUES ($1, $2, $3, NULL, $4)
             ON CONFLICT (case_id, author_id) WHERE session_index IS NULL
             DO UPDATE SET content = EXCLUDED.content, updated_at = NOW()
             RETURNING {NOTE_COLUMNS}"
        ))
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(case_id)
        .bind(author_id)
        .bind(content)
        .fetch_one(self.pool())
        .await?;
        row_to_note(&row)
    }

    async fn update_content(&self, id: &str, content: &str) -> Result<(), StorageError> {
        let rows_affected =
            sqlx::query("UPDATE session_notes SET content = $1, updated_at = NOW() WHERE id = $2")
                .bind(content)
                .bind(id)
                .execute(self.pool())
                .await?
                .rows_affected();
        if rows_affected == 0 {
            return Err(StorageError::NotFound { entity: "session_note", id: id.to_owned() });
        }
        Ok(())
    }

    async fn create_numbered(
        &self,
        case_id: &str,
        author_id: &str,
    ) -> Result<SessionNote, StorageError> {
        // The index is computed inside the INSERT, so two racing creates can
        // still collide on (case_id, session_index); the partial unique index
        // turns the loser into SQLSTATE 23505 → Duplicate.
        let row = sqlx::query(&format!(
            "INSERT INTO session_notes (id, case_id, author_id, session_index, content)
             VALUES ($1, $2, $3,
                     (SELECT COALESCE(MAX(session_index), 0) + 1
                      FROM session_notes WHERE case_id = $2),
                     '')
             RETURNING {NOTE_COLUMNS}"
        ))
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(case_id)
        .bind(author_id)
        .fetch_one(self.pool())
        .await?;
        row_to_note(&row)
    }

    async fn finalize(&self, id: &str) -> Result<(), StorageError> {
        let rows_affected = sqlx::query(
            "UPDATE session_notes
             SET finalized = TRUE, finalized_at = NOW(), updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .execute(self.pool())
        .await?
        .rows_affected();
        if rows_affected == 0 {
            return Err(StorageError::NotFound { entity: "session_note", id: id.to_owned() });
        }
        Ok(())
    }

    async fn notes_for_case(&self, case_id: &str) -> Result<Vec<SessionNote>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {NOTE_COLUMNS} FROM session_notes
             WHERE case_id = $1 ORDER BY updated_at DESC"
        ))
        .bind(case_id)
        .fetch_all(self.pool())
        .await?;
        rows.iter().map(row_to_note).collect()
    }

    async fn notes_by_index(
        &self,
        case_id: &str,
        session_index: Option<i32>,
        offset: usize,
        limit: usize,
    ) -> Result<Paginated<SessionNote>, StorageError> {
        let (total, rows) = if let Some(idx) = session_index {
            let total: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM session_notes WHERE case_id = $1 AND session_index = $2",
            )
            .bind(case_id)
            .bind(idx)
            .fetch_one(self.pool())
            .await?;
            let rows = sqlx::query(&format!(
                "SELECT {NOTE_COLUMNS} FROM session_notes
                 WHERE case_id = $1 AND session_index = $2
                 ORDER BY updated_at DESC LIMIT $3 OFFSET $4"
            ))
            .bind(case_id)
            .bind(idx)
            .bind(usize_to_i64(limit))
            .bind(usize_to_i64(offset))
            .fetch_all(self.pool())
            .await?;
            (total, rows)
        } else {
            let total: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM session_notes WHERE case_id = $1 AND session_index IS NULL",
            )
            .bind(case_id)
            .fetch_one(self.pool())
            .await?;
            let rows = sqlx::query(&format!(
                "SELECT {NOTE_COLUMNS} FROM session_notes
                 WHERE case_id = $1 AND session_index IS NULL
                 ORDER BY updated_at DESC LIMIT $2 OFFSET $3"
            ))
            .bind(case_id)
            .bind(usize_to_i64(limit))
            .bind(usize_to_i64(offset))
            .fetch_all(self.pool())
            .await?;
            (total, rows)
        };

        let items: Vec<SessionNote> =
            rows.iter().map(row_to_note).collect::<Result<_, StorageError>>()?;
        Ok(Paginated {
            items,
            total: u64::try_from(total).unwrap_or(0),
            offset: offset as u64,
            limit: limit as u64,
        })
    }
}
