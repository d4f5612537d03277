//! `dex-server` -- loads the Pokemon catalog and serves health endpoints.
//!
//! Configuration comes from flags with environment fallbacks:
//!   `--data` / `DEX_DATA`             -- CSV source (default: data/pokemon.csv)
//!   `--host` / `DEX_HOST`             -- bind host (default: 0.0.0.0)
//!   `--port` / `DEX_PORT`             -- bind port (default: 8080)
//!   `--lenient` / `DEX_LENIENT`       -- accept extra header columns
//!   `--log-format` / `DEX_LOG_FORMAT` -- `text` or `json`
//!
//! Log level is taken from `RUST_LOG` (default: info).

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use dex_core::LoaderOptions;
use dex_server::catalog::{log_summary, Catalog};
use dex_server::network::{NetworkConfig, NetworkModule};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

/// Loads a Pokemon CSV into memory and serves health probes over HTTP.
#[derive(Debug, Parser)]
#[command(name = "dex-server", version)]
struct Args {
    /// Path to the Pokemon CSV source.
    #[arg(long, env = "DEX_DATA", default_value = "data/pokemon.csv")]
    data: PathBuf,

    /// Host to bind.
    #[arg(long, env = "DEX_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to bind. 0 picks an ephemeral port.
    #[arg(long, env = "DEX_PORT", default_value_t = 8080)]
    port: u16,

    /// Accept header rows with columns the schema does not declare.
    #[arg(long, env = "DEX_LENIENT")]
    lenient: bool,

    #[arg(long, env = "DEX_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_format);

    let options = LoaderOptions {
        strict: !args.lenient,
        ..LoaderOptions::default()
    };
    let catalog = Catalog::new(options);
    // `LoadError` messages already embed their cause.
    catalog
        .load(&args.data)
        .map_err(|err| anyhow::anyhow!("failed to load {}: {err}", args.data.display()))?;
    log_summary(&catalog.snapshot());

    let config = NetworkConfig {
        host: args.host,
        port: args.port,
        ..NetworkConfig::default()
    };
    let mut module = NetworkModule::new(config, catalog);
    let port = module.start().await.context("failed to bind listener")?;
    info!(port, "dex-server listening");

    module.serve(shutdown_signal()).await?;
    info!("dex-server stopped");
    Ok(())
}
