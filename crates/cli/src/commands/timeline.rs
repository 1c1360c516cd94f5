use std::sync::Arc;

use anyhow::Result;
use casenotes_service::TimelineService;
use casenotes_storage::PgStorage;

use crate::{database_url, summarizer_from_env};

pub(crate) async fn run(case_id: &str) -> Result<()> {
    let storage = Arc::new(PgStorage::new(&database_url()?).await?);
    let summarizer = summarizer_from_env()?.map(Arc::new);

    let timeline = TimelineService::new(storage, summarizer);
    let overview = timeline.overview(case_id).await?;
    println!("{}", serde_json::to_string_pretty(&overview)?);
    Ok(())
}
