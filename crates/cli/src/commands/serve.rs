use std::sync::Arc;

use anyhow::Result;
use casenotes_http::{create_router, AppState};
use casenotes_service::TimelineService;
use casenotes_storage::{PgStorage, PracticeStore};

use crate::{database_url, summarizer_from_env};

pub(crate) async fn run(port: u16, host: String) -> Result<()> {
    let storage: Arc<dyn PracticeStore> = Arc::new(PgStorage::new(&database_url()?).await?);
    let summarizer = summarizer_from_env()?.map(Arc::new);

    let timeline = TimelineService::new(storage.clone(), summarizer);
    let state = Arc::new(AppState { store: storage, timeline });

    let router = create_router(state);
    let addr = format!("{host}:{port}");
    tracing::info!("Starting HTTP server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
