//! Case timeline: plan-vs-reality view over phases and notes.
//!
//! The overview joins planned treatment phases with stored notes by session
//! index. The deep reader pages through one index at a time and attaches a
//! digest: the external summarization endpoint when it answers, the local
//! digest otherwise. Digest generation never fails the page.

use std::collections::HashMap;
use std::sync::Arc;

use casenotes_core::{
    local_digest, truncate, Paginated, SessionNote, PREVIEWS_PER_PHASE, PREVIEW_MAX_CHARS,
    TIMELINE_PAGE_SIZE,
};
use casenotes_storage::{NoteStore, PhaseStore, PracticeStore};
use casenotes_summarize::SummarizeClient;
use chrono::NaiveDate;
use serde::Serialize;

use crate::error::ServiceError;

/// One phase of the treatment plan with its actual notes summarized.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseCard {
    pub phase_id: String,
    pub label: String,
    pub planned_on: Option<NaiveDate>,
    pub session_index: i32,
    pub note_count: usize,
    pub previews: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineOverview {
    pub cards: Vec<PhaseCard>,
    /// Notes with no session index (the "misc" bucket).
    pub unscheduled_notes: usize,
}

/// One page of the deep session reader.
#[derive(Debug, Clone, Serialize)]
pub struct SessionPage {
    pub session_index: Option<i32>,
    pub page: usize,
    pub total: u64,
    pub notes: Vec<SessionNote>,
    pub digest: String,
}

pub struct TimelineService {
    store: Arc<dyn PracticeStore>,
    summarizer: Option<Arc<SummarizeClient>>,
}

impl TimelineService {
    #[must_use]
    pub fn new(store: Arc<dyn PracticeStore>, summarizer: Option<Arc<SummarizeClient>>) -> Self {
        Self { store, summarizer }
    }

    /// Build the overview: one card per planned phase, notes grouped by
    /// session index. Fail-closed — if either the phases query or the notes
    /// query fails, the whole view errors and renders no cards.
    pub async fn overview(&self, case_id: &str) -> Result<TimelineOverview, ServiceError> {
        let phases = self.store.phases_for_case(case_id).await?;
        let notes = self.store.notes_for_case(case_id).await?;

        let mut by_index: HashMap<Option<i32>, Vec<&SessionNote>> = HashMap::new();
        for note in &notes {
            by_index.entry(note.session_index).or_default().push(note);
        }

        let cards = phases
            .iter()
            .map(|phase| {
                let group =
                    by_index.get(&Some(phase.session_index)).map_or(&[][..], Vec::as_slice);
                PhaseCard {
                    phase_id: phase.id.clone(),
                    label: phase.label.clone(),
                    planned_on: phase.planned_on,
                    session_index: phase.session_index,
                    note_count: group.len(),
                    previews: group
                        .iter()
                        .take(PREVIEWS_PER_PHASE)
                        .map(|n| truncate(&n.content, PREVIEW_MAX_CHARS).to_owned())
                        .collect(),
                }
            })
            .collect();

        let unscheduled_notes = by_index.get(&None).map_or(0, Vec::len);
        Ok(TimelineOverview { cards, unscheduled_notes })
    }

    /// One page of notes for an exact session index (`None` reads the
    /// "misc" bucket), newest first, with a digest for the page.
    pub async fn session_page(
        &self,
        case_id: &str,
        session_index: Option<i32>,
        page: usize,
    ) -> Result<SessionPage, ServiceError> {
        let offset = page.saturating_mul(TIMELINE_PAGE_SIZE);
        let Paginated { items, total, .. } = self
            .store
            .notes_by_index(case_id, session_index, offset, TIMELINE_PAGE_SIZE)
            .await?;

        let texts: Vec<String> = items.iter().map(|n| n.content.clone()).collect();
        let digest = self.digest_for(&texts).await;

        Ok(SessionPage { session_index, page, total, notes: items, digest })
    }

    /// Best-effort digest: endpoint response verbatim when it succeeds,
    /// local digest otherwise. Never errors.
    async fn digest_for(&self, texts: &[String]) -> String {
        if !texts.is_empty() {
            if let Some(client) = &self.summarizer {
                match client.summarize(texts).await {
                    Ok(summary) => return summary,
                    Err(e) if e.is_transient() => {
                        tracing::debug!(error = %e, "summarization unavailable, using local digest");
                    },
                    Err(e) => {
                        tracing::warn!(error = %e, "summarization failed, using local digest");
                    },
                }
            }
        }
        local_digest(texts)
    }
}
