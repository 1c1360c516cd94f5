//! Integration tests for PgStorage.
//! Run with: DATABASE_URL=... cargo test -p casenotes-storage -- --ignored pg_

#![allow(clippy::unwrap_used, reason = "integration test code")]

use casenotes_core::{AttachmentKind, NoteAttachment};
use casenotes_storage::traits::{AttachmentStore, NoteStore, PhaseStore};
use casenotes_storage::PgStorage;
use chrono::Utc;
use uuid::Uuid;

async fn create_pg_storage() -> PgStorage {
    let url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for PgStorage integration tests");
    PgStorage::new(&url).await.expect("Failed to connect to PostgreSQL")
}

fn unique_id() -> String {
    format!("test-{}", Uuid::new_v4())
}

// ── Draft lifecycle ──────────────────────────────────────────────

#[tokio::test]
#[ignore]
async fn pg_draft_upsert_is_single_row() {
    let storage = create_pg_storage().await;
    let case = unique_id();
    let author = unique_id();

    let first = storage.upsert_draft(&case, &author, "first pass").await.unwrap();
    assert!(first.is_draft());

    let second = storage.upsert_draft(&case, &author, "second pass").await.unwrap();
    assert_eq!(second.id, first.id, "second upsert must update the first draft, not insert");
    assert_eq!(second.content, "second pass");
    assert!(second.updated_at >= first.updated_at);

    let history = storage.load_history(&case, &author, 30).await.unwrap();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
#[ignore]
async fn pg_load_latest_tracks_updated_at() {
    let storage = create_pg_storage().await;
    let case = unique_id();
    let author = unique_id();

    assert!(storage.load_latest(&case, &author).await.unwrap().is_none());

    let draft = storage.upsert_draft(&case, &author, "draft body").await.unwrap();
    let numbered = storage.create_numbered(&case, &author).await.unwrap();

    // The numbered session was created last, so it is "latest".
    let latest = storage.load_latest(&case, &author).await.unwrap().unwrap();
    assert_eq!(latest.id, numbered.id);

    // Touching the draft makes it latest again.
    storage.update_content(&draft.id, "draft touched").await.unwrap();
    let latest = storage.load_latest(&case, &author).await.unwrap().unwrap();
    assert_eq!(latest.id, draft.id);
    assert_eq!(latest.content, "draft touched");
}

// ── Session versioning ───────────────────────────────────────────

#[tokio::test]
#[ignore]
async fn pg_session_indices_are_monotonic() {
    let storage = create_pg_storage().await;
    let case = unique_id();
    let author = unique_id();

    let s1 = storage.create_numbered(&case, &author).await.unwrap();
    let s2 = storage.create_numbered(&case, &author).await.unwrap();
    let s3 = storage.create_numbered(&case, &author).await.unwrap();
    assert_eq!(s1.session_index, Some(1));
    assert_eq!(s2.session_index, Some(2));
    assert_eq!(s3.session_index, Some(3));
    assert!(s3.content.is_empty());
}

#[tokio::test]
#[ignore]
async fn pg_finalize_stamps_note() {
    let storage = create_pg_storage().await;
    let case = unique_id();
    let author = unique_id();

    let note = storage.create_numbered(&case, &author).await.unwrap();
    assert!(!note.finalized);

    storage.finalize(&note.id).await.unwrap();
    let reloaded = storage.load_by_id(&note.id).await.unwrap().unwrap();
    assert!(reloaded.finalized);
    assert!(reloaded.finalized_at.is_some());

    // Advisory only: content stays writable after finalize.
    storage.update_content(&note.id, "post-finalize edit").await.unwrap();
    let reloaded = storage.load_by_id(&note.id).await.unwrap().unwrap();
    assert_eq!(reloaded.content, "post-finalize edit");
}

#[tokio::test]
#[ignore]
async fn pg_update_missing_note_is_not_found() {
    let storage = create_pg_storage().await;
    let err = storage.update_content(&unique_id(), "ghost").await.unwrap_err();
    assert!(matches!(err, casenotes_storage::StorageError::NotFound { .. }));
}

// ── Timeline reads ───────────────────────────────────────────────

#[tokio::test]
#[ignore]
async fn pg_notes_by_index_paginates_exact_matches() {
    let storage = create_pg_storage().await;
    let case = unique_id();
    let author = unique_id();

    let numbered = storage.create_numbered(&case, &author).await.unwrap();
    storage.update_content(&numbered.id, "session one notes").await.unwrap();
    storage.upsert_draft(&case, &author, "unnumbered scratch").await.unwrap();

    let page = storage.notes_by_index(&case, Some(1), 0, 5).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].content, "session one notes");

    let misc = storage.notes_by_index(&case, None, 0, 5).await.unwrap();
    assert_eq!(misc.total, 1);
    assert_eq!(misc.items[0].content, "unnumbered scratch");
}

// ── Attachments ──────────────────────────────────────────────────

#[tokio::test]
#[ignore]
async fn pg_agenda_items_complete_on_demand() {
    let storage = create_pg_storage().await;
    let case = unique_id();
    let author = unique_id();
    let note = storage.create_numbered(&case, &author).await.unwrap();

    for (kind, label) in [
        (AttachmentKind::Agenda, "review homework"),
        (AttachmentKind::Agenda, "discuss sleep log"),
        (AttachmentKind::Resource, "breathing exercise PDF"),
    ] {
        storage
            .add_attachment(&NoteAttachment {
                id: unique_id(),
                note_id: note.id.clone(),
                kind,
                label: label.to_owned(),
                url: None,
                done: false,
                created_at: Utc::now(),
            })
            .await
            .unwrap();
    }

    let completed = storage.complete_agenda_items(&note.id).await.unwrap();
    assert_eq!(completed, 2, "only agenda items are completed");

    let attachments = storage.attachments_for_note(&note.id).await.unwrap();
    let agenda_done = attachments
        .iter()
        .filter(|a| a.kind == AttachmentKind::Agenda)
        .all(|a| a.done);
    assert!(agenda_done);
    assert!(attachments.iter().any(|a| a.kind == AttachmentKind::Resource && !a.done));
}

#[tokio::test]
#[ignore]
async fn pg_phases_ordered_by_session_index() {
    let storage = create_pg_storage().await;
    let case = unique_id();

    for (idx, label) in [(3, "consolidation"), (1, "intake"), (2, "exposure work")] {
        storage
            .save_phase(&casenotes_core::TreatmentPhase {
                id: unique_id(),
                case_id: case.clone(),
                label: label.to_owned(),
                planned_on: None,
                session_index: idx,
                created_at: Utc::now(),
            })
            .await
            .unwrap();
    }

    let phases = storage.phases_for_case(&case).await.unwrap();
    let labels: Vec<&str> = phases.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["intake", "exposure work", "consolidation"]);
}
