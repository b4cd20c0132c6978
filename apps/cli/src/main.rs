//! chunkput entry point.

mod app;
mod config;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Parser)]
#[command(name = "chunkput", version)]
#[command(about = "Upload a file to a resumable upload session")]
pub struct Cli {
    /// File to upload
    pub file: PathBuf,

    /// Session URL returned by the server when the upload was initiated
    pub url: Url,

    /// Content-Type sent with every chunk
    #[arg(long)]
    pub content_type: Option<String>,

    /// Maximum bytes per chunk request
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long = "timeout", value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Configuration file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,chunkput=debug")),
        )
        .init();

    let cli = Cli::parse();

    // Load configuration; flags win over file values.
    let mut config = config::Config::load(cli.config.as_deref())?;
    config.apply_overrides(cli.content_type.clone(), cli.chunk_size, cli.timeout_secs);
    tracing::debug!(
        chunk_size = config.upload.chunk_size,
        timeout_secs = config.upload.request_timeout_secs,
        "configuration loaded"
    );

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(app::run(cli, config))
}
