//! In-memory `PracticeStore` with failure injection for service tests.

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use casenotes_core::{
    AttachmentKind, NoteAttachment, NoteRef, Paginated, SessionNote, TreatmentPhase,
};
use casenotes_storage::traits::{AttachmentStore, NoteStore, PhaseStore};
use casenotes_storage::StorageError;
use chrono::{DateTime, Utc};

#[derive(Default)]
pub struct MemStore {
    notes: Mutex<Vec<SessionNote>>,
    phases: Mutex<Vec<TreatmentPhase>>,
    attachments: Mutex<Vec<NoteAttachment>>,
    /// Monotonic clock so `updated_at` ordering is deterministic.
    tick: AtomicI64,
    pub persist_calls: AtomicUsize,
    /// Stalls writes for this long, to let tests interleave a context
    /// switch with an in-flight save.
    pub write_delay_ms: AtomicU64,
    pub fail_writes: AtomicBool,
    pub fail_note_reads: AtomicBool,
    pub fail_phase_reads: AtomicBool,
    pub collide_next_create: AtomicBool,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap()
}

fn injected_failure() -> StorageError {
    StorageError::Database(sqlx::Error::PoolTimedOut)
}

async fn stall(delay_ms: &AtomicU64) {
    let ms = delay_ms.load(Ordering::SeqCst);
    if ms > 0 {
        tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
    }
}

impl MemStore {
    fn now(&self) -> DateTime<Utc> {
        let secs = self.tick.fetch_add(1, Ordering::SeqCst);
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    pub fn persist_count(&self) -> usize {
        self.persist_calls.load(Ordering::SeqCst)
    }

    pub fn note_rows(&self) -> Vec<SessionNote> {
        lock(&self.notes).clone()
    }

    pub fn attachment_rows(&self) -> Vec<NoteAttachment> {
        lock(&self.attachments).clone()
    }

    /// Seed a note directly, bypassing the persist counter.
    pub fn push_note(
        &self,
        case_id: &str,
        author_id: &str,
        session_index: Option<i32>,
        content: &str,
    ) -> SessionNote {
        let now = self.now();
        let note = SessionNote {
            id: uuid::Uuid::new_v4().to_string(),
            case_id: case_id.to_owned(),
            author_id: author_id.to_owned(),
            session_index,
            content: content.to_owned(),
            finalized: false,
            finalized_at: None,
            created_at: now,
            updated_at: now,
        };
        lock(&self.notes).push(note.clone());
        note
    }

    pub fn push_phase(&self, case_id: &str, session_index: i32, label: &str) -> TreatmentPhase {
        let phase = TreatmentPhase {
            id: uuid::Uuid::new_v4().to_string(),
            case_id: case_id.to_owned(),
            label: label.to_owned(),
            planned_on: None,
            session_index,
            created_at: self.now(),
        };
        lock(&self.phases).push(phase.clone());
        phase
    }
}

#[async_trait]
impl NoteStore for MemStore {
    async fn load_latest(
        &self,
        case_id: &str,
        author_id: &str,
    ) -> Result<Option<SessionNote>, StorageError> {
        if self.fail_note_reads.load(Ordering::SeqCst) {
            return Err(injected_failure());
        }
        Ok(lock(&self.notes)
            .iter()
            .filter(|n| n.case_id == case_id && n.author_id == author_id)
            .max_by_key(|n| n.updated_at)
            .cloned())
    }

    async fn load_by_id(&self, id: &str) -> Result<Option<SessionNote>, StorageError> {
        if self.fail_note_reads.load(Ordering::SeqCst) {
            return Err(injected_failure());
        }
        Ok(lock(&self.notes).iter().find(|n| n.id == id).cloned())
    }

    async fn load_history(
        &self,
        case_id: &str,
        author_id: &str,
        limit: usize,
    ) -> Result<Vec<NoteRef>, StorageError> {
        let mut rows: Vec<SessionNote> = lock(&self.notes)
            .iter()
            .filter(|n| n.case_id == case_id && n.author_id == author_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(rows
            .into_iter()
            .take(limit)
            .map(|n| NoteRef { id: n.id, session_index: n.session_index, updated_at: n.updated_at })
            .collect())
    }

    async fn upsert_draft(
        &self,
        case_id: &str,
        author_id: &str,
        content: &str,
    ) -> Result<SessionNote, StorageError> {
        stall(&self.write_delay_ms).await;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(injected_failure());
        }
        self.persist_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.now();
        let mut notes = lock(&self.notes);
        if let Some(existing) = notes.iter_mut().find(|n| {
            n.case_id == case_id && n.author_id == author_id && n.session_index.is_none()
        }) {
            existing.content = content.to_owned();
            existing.updated_at = now;
            return Ok(existing.clone());
        }
        let note = SessionNote {
            id: uuid::Uuid::new_v4().to_string(),
            case_id: case_id.to_owned(),
            author_id: author_id.to_owned(),
            session_index: None,
            content: content.to_owned(),
            finalized: false,
            finalized_at: None,
            created_at: now,
            updated_at: now,
        };
        notes.push(note.clone());
        Ok(note)
    }

    async fn update_content(&self, id: &str, content: &str) -> Result<(), StorageError> {
        stall(&self.write_delay_ms).await;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(injected_failure());
        }
        self.persist_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.now();
        let mut notes = lock(&self.notes);
        let Some(note) = notes.iter_mut().find(|n| n.id == id) else {
            return Err(StorageError::NotFound { entity: "session_note", id: id.to_owned() });
        };
        note.content = content.to_owned();
        note.updated_at = now;
        Ok(())
    }

    async fn create_numbered(
        &self,
        case_id: &str,
        author_id: &str,
    ) -> Result<SessionNote, StorageError> {
        if self.collide_next_create.swap(false, Ordering::SeqCst) {
            return Err(StorageError::Duplicate(
                "duplicate key value violates unique constraint \"idx_notes_case_session\""
                    .to_owned(),
            ));
        }
        let now = self.now();
        let mut notes = lock(&self.notes);
        let next = notes
            .iter()
            .filter(|n| n.case_id == case_id)
            .filter_map(|n| n.session_index)
            .max()
            .unwrap_or(0)
            + 1;
        let note = SessionNote {
            id: uuid::Uuid::new_v4().to_string(),
            case_id: case_id.to_owned(),
            author_id: author_id.to_owned(),
            session_index: Some(next),
            content: String::new(),
            finalized: false,
            finalized_at: None,
            created_at: now,
            updated_at: now,
        };
        notes.push(note.clone());
        Ok(note)
    }

    async fn finalize(&self, id: &str) -> Result<(), StorageError> {
        let now = self.now();
        let mut notes = lock(&self.notes);
        let Some(note) = notes.iter_mut().find(|n| n.id == id) else {
            return Err(StorageError::NotFound { entity: "session_note", id: id.to_owned() });
        };
        note.finalized = true;
        note.finalized_at = Some(now);
        note.updated_at = now;
        Ok(())
    }

    async fn notes_for_case(&self, case_id: &str) -> Result<Vec<SessionNote>, StorageError> {
        if self.fail_note_reads.load(Ordering::SeqCst) {
            return Err(injected_failure());
        }
        let mut rows: Vec<SessionNote> =
            lock(&self.notes).iter().filter(|n| n.case_id == case_id).cloned().collect();
        rows.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(rows)
    }

    async fn notes_by_index(
        &self,
        case_id: &str,
        session_index: Option<i32>,
        offset: usize,
        limit: usize,
    ) -> Result<Paginated<SessionNote>, StorageError> {
        if self.fail_note_reads.load(Ordering::SeqCst) {
            return Err(injected_failure());
        }
        let mut rows: Vec<SessionNote> = lock(&self.notes)
            .iter()
            .filter(|n| n.case_id == case_id && n.session_index == session_index)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        let total = rows.len() as u64;
        let items: Vec<SessionNote> = rows.into_iter().skip(offset).take(limit).collect();
        Ok(Paginated { items, total, offset: offset as u64, limit: limit as u64 })
    }
}

#[async_trait]
impl PhaseStore for MemStore {
    async fn phases_for_case(&self, case_id: &str) -> Result<Vec<TreatmentPhase>, StorageError> {
        if self.fail_phase_reads.load(Ordering::SeqCst) {
            return Err(injected_failure());
        }
        let mut rows: Vec<TreatmentPhase> =
            lock(&self.phases).iter().filter(|p| p.case_id == case_id).cloned().collect();
        rows.sort_by_key(|p| p.session_index);
        Ok(rows)
    }

    async fn save_phase(&self, phase: &TreatmentPhase) -> Result<(), StorageError> {
        let mut phases = lock(&self.phases);
        phases.retain(|p| p.id != phase.id);
        phases.push(phase.clone());
        Ok(())
    }
}

#[async_trait]
impl AttachmentStore for MemStore {
    async fn add_attachment(&self, attachment: &NoteAttachment) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(injected_failure());
        }
        lock(&self.attachments).push(attachment.clone());
        Ok(())
    }

    async fn attachments_for_note(
        &self,
        note_id: &str,
    ) -> Result<Vec<NoteAttachment>, StorageError> {
        let mut rows: Vec<NoteAttachment> =
            lock(&self.attachments).iter().filter(|a| a.note_id == note_id).cloned().collect();
        rows.sort_by_key(|a| a.created_at);
        Ok(rows)
    }

    async fn complete_agenda_items(&self, note_id: &str) -> Result<usize, StorageError> {
        let mut count = 0;
        for attachment in lock(&self.attachments).iter_mut() {
            if attachment.note_id == note_id
                && attachment.kind == AttachmentKind::Agenda
                && !attachment.done
            {
                attachment.done = true;
                count += 1;
            }
        }
        Ok(count)
    }
}
