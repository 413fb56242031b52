use clap::Parser;
use nt_core::{ArticleStorage, FeedConfig, Paginator, Result, DEFAULT_PAGE_LIMIT};
use nt_web::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};

async fn check_storage(storage: &Arc<dyn ArticleStorage>, storage_type: &str) -> Result<()> {
    let total = storage.count().await?;
    info!("🏦 Storage backend initialized successfully (using {}, {} articles)", storage_type, total);
    Ok(())
}

async fn check_storage_with_retry(storage: &Arc<dyn ArticleStorage>, storage_type: &str, max_retries: u32, timeout: Duration) -> Result<()> {
    let mut retries = 0;
    let mut last_error = None;

    while retries < max_retries {
        match tokio::time::timeout(timeout, check_storage(storage, storage_type)).await {
            Ok(Ok(())) => return Ok(()),
            Ok(Err(e)) => last_error = Some(e),
            Err(timeout_error) => {
                last_error = Some(nt_core::Error::Storage(format!("Storage health check timed out: {}", timeout_error)));
            }
        }
        retries += 1;
        if retries < max_retries {
            info!("Storage health check failed, retrying {}/{}...", retries, max_retries);
            tokio::time::sleep(Duration::from_secs(2)).await;
        }
    }

    Err(last_error.unwrap_or_else(|| nt_core::Error::Storage("Storage health check failed after all retries".to_string())))
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Storage backend: memory or sqlite
    #[arg(long, default_value = "memory")]
    storage: String,
    /// Database location for backends that need one (SQLite file path)
    #[arg(long)]
    backend_url: Option<String>,
    /// Articles per page
    #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT, value_parser = clap::value_parser!(u64).range(1..))]
    page_size: u64,
    /// Seconds to wait for the storage health check
    #[arg(long, default_value_t = 10)]
    check_timeout: u64,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Serve the feed over HTTP
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: SocketAddr,
    },
    /// Print one page of the feed as JSON
    Page {
        page: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();
    let cli = Cli::parse();

    let storage = nt_storage::create_storage(cli.storage.as_str(), cli.backend_url.as_deref()).await?;

    info!("💾 Checking storage connection...");
    check_storage_with_retry(&storage, &cli.storage, 3, Duration::from_secs(cli.check_timeout)).await?;

    let config = FeedConfig::with_limit(cli.page_size)?;

    match cli.command {
        Commands::Serve { addr } => {
            nt_web::serve(addr, AppState::new(storage, config)).await?;
        }
        Commands::Page { page } => {
            let paginator = Paginator::new(storage, config);
            match nt_web::feed_page(&paginator, page.as_deref()).await {
                Ok(response) => println!("{}", serde_json::to_string_pretty(&response)?),
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
