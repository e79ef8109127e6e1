//! Server binary for docling-gateway.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `GatewayConfig` and `DoclingCli`, installs logging and serves until Ctrl-C.

use anyhow::{Context, Result};
use clap::Parser;
use docling_gateway::config::{DEFAULT_BIND_ADDR, DEFAULT_FETCH_TIMEOUT_SECS};
use docling_gateway::{serve_with_shutdown, DoclingCli, Gateway, GatewayConfig};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "docling-gateway",
    version,
    about = "Convert uploaded or remote documents to text, Markdown and structure over HTTP",
    long_about = None
)]
struct Cli {
    /// Address to listen on.
    #[arg(long, env = "DOCLING_GATEWAY_ADDR", default_value = DEFAULT_BIND_ADDR)]
    addr: String,

    /// Timeout for /parse-url fetches, in seconds.
    #[arg(long, env = "DOCLING_GATEWAY_FETCH_TIMEOUT", default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
    fetch_timeout: u64,

    /// Largest accepted request body, in MiB.
    #[arg(long, env = "DOCLING_GATEWAY_MAX_UPLOAD_MB", default_value_t = 50)]
    max_upload_mb: usize,

    /// Directory for transient files (default: system temp dir).
    #[arg(long, env = "DOCLING_GATEWAY_TEMP_DIR")]
    temp_dir: Option<PathBuf>,

    /// docling executable to run.
    #[arg(long, env = "DOCLING_BIN", default_value = "docling")]
    docling_bin: PathBuf,

    /// Extra argument passed to docling before the input path (repeatable).
    #[arg(
        long = "docling-arg",
        env = "DOCLING_ARGS",
        value_delimiter = ' ',
        allow_hyphen_values = true
    )]
    docling_args: Vec<String>,

    /// Debug-level logging.
    #[arg(short, long, env = "DOCLING_GATEWAY_VERBOSE")]
    verbose: bool,

    /// Errors only.
    #[arg(short, long, env = "DOCLING_GATEWAY_QUIET", conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Configuration ────────────────────────────────────────────────────
    let mut builder = GatewayConfig::builder()
        .bind_addr(cli.addr)
        .fetch_timeout_secs(cli.fetch_timeout)
        .max_upload_bytes(cli.max_upload_mb.saturating_mul(1024 * 1024));
    if let Some(dir) = cli.temp_dir {
        builder = builder.temp_dir(dir);
    }
    let config = builder.build().context("Invalid configuration")?;

    let converter = DoclingCli::new()
        .program(cli.docling_bin)
        .args(cli.docling_args.into_iter().filter(|a| !a.is_empty()));

    let addr = config.bind_addr.clone();
    let gateway = Gateway::new(Arc::new(converter), config).context("Failed to build gateway")?;

    // ── Serve ────────────────────────────────────────────────────────────
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(
        "Docling Resume Parser Service listening on {}",
        listener.local_addr().context("Failed to read local address")?
    );

    serve_with_shutdown(listener, gateway, shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
