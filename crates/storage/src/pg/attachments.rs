//! AttachmentStore implementation for PgStorage.

use super::*;

use crate::traits::AttachmentStore;
use async_trait::async_trait;

#[async_trait]
impl AttachmentStore for PgStorage {
    async fn add_attachment(&self, attachment: &NoteAttachment) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO note_attachments (id, note_id, kind, label, url, done, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&attachment.id)
        .bind(&attachment.note_id)
        .bind(attachment.kind.as_str())
        .bind(&attachment.label)
        .bind(&attachment.url)
        .bind(attachment.done)
        .bind(attachment.created_at)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn attachments_for_note(
        &self,
        note_id: &str,
    ) -> Result<Vec<NoteAttachment>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {ATTACHMENT_COLUMNS} FROM note_attachments
             WHERE note_id = $1 ORDER BY created_at ASC"
        ))
        .bind(note_id)
        .fetch_all(self.pool())
        .await?;
        rows.iter().map(row_to_attachment).collect()
    }

    async fn complete_agenda_items(&self, note_id: &str) -> Result<usize, StorageError> {
        let rows_affected = sqlx::query(
            "UPDATE note_attachments SET done = TRUE
             WHERE note_id = $1 AND kind = 'agenda' AND done = FALSE",
        )
        .bind(note_id)
        .execute(self.pool())
        .await?
        .rows_affected();
        Ok(usize::try_from(rows_affected).unwrap_or(0))
    }
}
