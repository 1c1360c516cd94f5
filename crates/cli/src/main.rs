use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "casenotes")]
#[command(about = "Session notes backend for a therapy practice", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server.
    Serve {
        #[arg(short, long, default_value = "8088")]
        port: u16,
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,
    },
    /// Apply database migrations and exit.
    Migrate,
    /// Print the session history for a (case, author) as JSON.
    History {
        #[arg(long)]
        case: String,
        #[arg(long)]
        author: String,
    },
    /// Print the case timeline overview as JSON.
    Timeline {
        #[arg(long)]
        case: String,
    },
}

fn database_url() -> Result<String> {
    std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable must be set"))
}

/// Optional summarization endpoint. Without it the timeline uses the local
/// digest only.
fn summarizer_from_env() -> Result<Option<casenotes_summarize::SummarizeClient>> {
    let Ok(base_url) = std::env::var("CASENOTES_SUMMARIZE_URL") else {
        tracing::info!("CASENOTES_SUMMARIZE_URL not set, timeline digests are local-only");
        return Ok(None);
    };
    let api_key = std::env::var("CASENOTES_SUMMARIZE_KEY").ok();
    Ok(Some(casenotes_summarize::SummarizeClient::new(base_url, api_key)?))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Serve { port, host } => commands::serve::run(port, host).await,
        Commands::Migrate => commands::migrate::run().await,
        Commands::History { case, author } => commands::history::run(&case, &author).await,
        Commands::Timeline { case } => commands::timeline::run(&case).await,
    }
}
