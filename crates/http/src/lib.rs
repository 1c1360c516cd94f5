//! HTTP API server for casenotes.
//!
//! Thin axum layer over the storage and timeline services, for hosting the
//! note editor outside the desktop embedding. Handlers never log note
//! content; ids and lengths only.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(unreachable_pub, reason = "pub items are re-exported")]

pub mod api_error;
mod api_types;
mod handlers;

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;

use casenotes_service::TimelineService;
use casenotes_storage::PracticeStore;

pub use api_error::ApiError;
pub use api_types::VersionResponse;

/// Shared application state for all HTTP handlers.
pub struct AppState {
    pub store: Arc<dyn PracticeStore>,
    pub timeline: TimelineService,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/version", get(version))
        .route("/api/cases/{case_id}/notes/latest", get(handlers::notes::latest_note))
        .route("/api/cases/{case_id}/notes/history", get(handlers::notes::note_history))
        .route("/api/cases/{case_id}/notes/draft", post(handlers::notes::save_draft))
        .route("/api/cases/{case_id}/sessions", post(handlers::notes::create_session))
        .route("/api/notes/{id}", get(handlers::notes::get_note))
        .route("/api/notes/{id}", put(handlers::notes::update_note))
        .route("/api/notes/{id}/finalize", post(handlers::notes::finalize_note))
        .route(
            "/api/notes/{id}/attachments",
            get(handlers::attachments::list_attachments).post(handlers::attachments::add_attachment),
        )
        .route("/api/cases/{case_id}/timeline", get(handlers::timeline::timeline_overview))
        .route("/api/cases/{case_id}/timeline/{index}", get(handlers::timeline::session_page))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse { version: env!("CARGO_PKG_VERSION") })
}
