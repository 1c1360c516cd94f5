use anyhow::Result;
use casenotes_storage::PgStorage;

use crate::database_url;

/// Connecting runs the idempotent migration set; nothing else to do.
pub(crate) async fn run() -> Result<()> {
    PgStorage::new(&database_url()?).await?;
    tracing::info!("Migrations applied");
    Ok(())
}
