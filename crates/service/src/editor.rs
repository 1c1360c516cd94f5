//! Per-(case, author) note editing workspace.
//!
//! Tracks unsaved work, debounces autosave behind a single-slot scheduled
//! task, and drives the draft / numbered-session state machine. Identity is
//! passed in explicitly; nothing here reads ambient auth context.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use casenotes_core::{
    trimmed_eq, AttachmentKind, NoteAttachment, NoteRef, SessionNote, AUTOSAVE_QUIET_MS,
    HISTORY_PAGE_SIZE,
};
use casenotes_storage::{AttachmentStore, NoteStore, PracticeStore, StorageError};
use chrono::Utc;
use tokio::task::JoinHandle;

use crate::error::ServiceError;

#[derive(Debug, Default)]
struct EditorState {
    /// Active persisted note, if any. `None` until the first draft save of a
    /// fresh case.
    note: Option<SessionNote>,
    /// Snapshot of the content at the last successful save. Assigned from
    /// the value we sent, not re-fetched, to avoid an extra round trip.
    last_saved_text: String,
    current_text: String,
    saving: bool,
    save_failed: bool,
    /// Bumped on every context switch. A save that was in flight when the
    /// switch happened completes against the old epoch and must not touch
    /// the new context's state.
    epoch: u64,
}

/// Editing workspace for one therapist on one case.
///
/// Wrap in `Arc`; `set_text` spawns the debounce task and needs a handle to
/// clone. The only cancellable unit is the pending debounce task — an
/// in-flight save is never cancelled.
pub struct NoteEditor {
    store: Arc<dyn PracticeStore>,
    case_id: String,
    author_id: String,
    quiet_period: Duration,
    state: Mutex<EditorState>,
    pending_save: Mutex<Option<JoinHandle<()>>>,
}

impl NoteEditor {
    #[must_use]
    pub fn new(
        store: Arc<dyn PracticeStore>,
        case_id: impl Into<String>,
        author_id: impl Into<String>,
    ) -> Self {
        Self {
            store,
            case_id: case_id.into(),
            author_id: author_id.into(),
            quiet_period: Duration::from_millis(AUTOSAVE_QUIET_MS),
            state: Mutex::new(EditorState::default()),
            pending_save: Mutex::new(None),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, EditorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load the most recently updated note for this (case, author), or an
    /// empty editor when none exists yet. Resets the dirty state either way.
    pub async fn open_latest(&self) -> Result<Option<SessionNote>, ServiceError> {
        self.cancel_pending_save();
        let note = self.store.load_latest(&self.case_id, &self.author_id).await?;
        self.reset_to(note.clone());
        Ok(note)
    }

    /// Switch to a specific prior session from the history picker.
    ///
    /// Discards unsaved edits from the previous context without prompting;
    /// the hosting application applies its own navigation guard via
    /// [`Self::is_dirty`] / [`Self::is_saving`] before calling this.
    pub async fn open_session(&self, note_id: &str) -> Result<SessionNote, ServiceError> {
        self.cancel_pending_save();
        let note = self.store.load_by_id(note_id).await?.ok_or_else(|| {
            ServiceError::Storage(StorageError::NotFound {
                entity: "session_note",
                id: note_id.to_owned(),
            })
        })?;
        if note.case_id != self.case_id || note.author_id != self.author_id {
            return Err(ServiceError::InvalidInput(format!(
                "note {note_id} does not belong to this workspace"
            )));
        }
        self.reset_to(Some(note.clone()));
        Ok(note)
    }

    /// Replace the editable buffer. When the buffer differs (post-trim) from
    /// the last saved text, the debounce timer restarts; an earlier pending
    /// autosave is cancelled, not queued.
    pub fn set_text(self: &Arc<Self>, text: &str) {
        let dirty = {
            let mut state = self.lock_state();
            state.current_text = text.to_owned();
            !trimmed_eq(&state.current_text, &state.last_saved_text)
        };
        if dirty {
            self.schedule_autosave();
        } else {
            self.cancel_pending_save();
        }
    }

    /// Persist the current buffer immediately.
    ///
    /// A clean or whitespace-only buffer is a successful no-op (`false`) —
    /// blank input never clobbers stored content. Returns `true` when a
    /// write happened. On failure the dirty flag stays set so the next
    /// debounce cycle retries.
    pub async fn save_now(&self) -> Result<bool, ServiceError> {
        let (epoch, note_id, snapshot) = {
            let mut state = self.lock_state();
            if state.current_text.trim().is_empty()
                || trimmed_eq(&state.current_text, &state.last_saved_text)
            {
                return Ok(false);
            }
            state.saving = true;
            (state.epoch, state.note.as_ref().map(|n| n.id.clone()), state.current_text.clone())
        };

        let result = match &note_id {
            Some(id) => self.store.update_content(id, &snapshot).await.map(|()| None),
            None => {
                self.store.upsert_draft(&self.case_id, &self.author_id, &snapshot).await.map(Some)
            },
        };

        let mut state = self.lock_state();
        if state.epoch != epoch {
            // A different note was opened while this save was in flight.
            // The write targeted the old row; the new context keeps its
            // freshly reset snapshot.
            return match result {
                Ok(_) => Ok(true),
                Err(e) => Err(e.into()),
            };
        }
        state.saving = false;
        match result {
            Ok(persisted) => {
                match persisted {
                    Some(note) => state.note = Some(note),
                    None => {
                        if let Some(n) = state.note.as_mut() {
                            n.content = snapshot.clone();
                        }
                    },
                }
                state.last_saved_text = snapshot;
                state.save_failed = false;
                Ok(true)
            },
            Err(e) => {
                state.save_failed = true;
                Err(e.into())
            },
        }
    }

    /// Start the next numbered session for this case and make it the active
    /// editing target. Two racing creates can collide on the same index; the
    /// loser surfaces as a duplicate error, never a silent retry.
    pub async fn start_session(&self) -> Result<SessionNote, ServiceError> {
        self.cancel_pending_save();
        let note = self.store.create_numbered(&self.case_id, &self.author_id).await?;
        self.reset_to(Some(note.clone()));
        Ok(note)
    }

    /// End the active session: flush unsaved text, stamp it finalized and
    /// mark its agenda items done. Finalization is advisory — the content
    /// stays editable afterwards.
    pub async fn finalize_session(&self) -> Result<(), ServiceError> {
        self.cancel_pending_save();
        self.save_now().await?;

        let note_id = self.lock_state().note.as_ref().map(|n| n.id.clone());
        let Some(id) = note_id else {
            return Err(ServiceError::InvalidInput("no active note to finalize".into()));
        };

        self.store.finalize(&id).await?;
        let done = self.store.complete_agenda_items(&id).await?;
        if done > 0 {
            tracing::debug!(count = done, note_id = %id, "agenda items completed on finalize");
        }

        let mut state = self.lock_state();
        if let Some(n) = state.note.as_mut() {
            n.finalized = true;
            n.finalized_at = Some(Utc::now());
        }
        Ok(())
    }

    /// Append an agenda item or resource reference to the active note,
    /// persisting the draft first when it has no row yet.
    pub async fn attach(
        &self,
        kind: AttachmentKind,
        label: &str,
        url: Option<String>,
    ) -> Result<NoteAttachment, ServiceError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(ServiceError::InvalidInput("attachment label is required".into()));
        }

        if self.lock_state().note.is_none() {
            self.save_now().await?;
        }
        let note_id = self.lock_state().note.as_ref().map(|n| n.id.clone()).ok_or_else(|| {
            ServiceError::InvalidInput("cannot attach to an empty, unsaved note".into())
        })?;

        let attachment = NoteAttachment {
            id: uuid::Uuid::new_v4().to_string(),
            note_id,
            kind,
            label: label.to_owned(),
            url,
            done: false,
            created_at: Utc::now(),
        };
        self.store.add_attachment(&attachment).await?;
        Ok(attachment)
    }

    /// Session-picker rows for this workspace, newest first.
    pub async fn history(&self) -> Result<Vec<NoteRef>, ServiceError> {
        Ok(self.store.load_history(&self.case_id, &self.author_id, HISTORY_PAGE_SIZE).await?)
    }

    /// Whether the buffer differs (post-trim) from the last saved text.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        let state = self.lock_state();
        !trimmed_eq(&state.current_text, &state.last_saved_text)
    }

    /// Whether a persist call is currently in flight.
    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.lock_state().saving
    }

    /// Whether the most recent save attempt failed. Cleared by the next
    /// successful save.
    #[must_use]
    pub fn last_save_failed(&self) -> bool {
        self.lock_state().save_failed
    }

    #[must_use]
    pub fn current_text(&self) -> String {
        self.lock_state().current_text.clone()
    }

    /// Snapshot of the active persisted note, if any.
    #[must_use]
    pub fn active_note(&self) -> Option<SessionNote> {
        self.lock_state().note.clone()
    }

    fn reset_to(&self, note: Option<SessionNote>) {
        let text = note.as_ref().map(|n| n.content.clone()).unwrap_or_default();
        let mut state = self.lock_state();
        state.note = note;
        state.last_saved_text.clone_from(&text);
        state.current_text = text;
        state.saving = false;
        state.save_failed = false;
        state.epoch = state.epoch.wrapping_add(1);
    }

    /// Single-slot debounce: replace, never queue. The previous pending task
    /// is aborted before its timer fires.
    fn schedule_autosave(self: &Arc<Self>) {
        let editor = Arc::clone(self);
        let task = tokio::spawn(async move {
            tokio::time::sleep(editor.quiet_period).await;
            if let Err(e) = editor.save_now().await {
                tracing::warn!(
                    error = %e,
                    case_id = %editor.case_id,
                    "autosave failed; buffer stays dirty until the next cycle"
                );
            }
        });

        let mut pending = self.pending_save.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.replace(task) {
            previous.abort();
        }
    }

    fn cancel_pending_save(&self) {
        let mut pending = self.pending_save.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(task) = pending.take() {
            task.abort();
        }
    }
}
