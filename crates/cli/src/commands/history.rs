use anyhow::Result;
use casenotes_core::HISTORY_PAGE_SIZE;
use casenotes_storage::traits::NoteStore;
use casenotes_storage::PgStorage;

use crate::database_url;

pub(crate) async fn run(case_id: &str, author_id: &str) -> Result<()> {
    let storage = PgStorage::new(&database_url()?).await?;
    let refs = storage.load_history(case_id, author_id, HISTORY_PAGE_SIZE).await?;
    println!("{}", serde_json::to_string_pretty(&refs)?);
    Ok(())
}
