//! Media Cloner - Main entry point

use anyhow::Result;
use cloner_common::logging::{init_logging, LogConfig};
use std::sync::Arc;
use tokio::signal;
use tracing::info;

use cloner_daemon::{
    config::Config,
    db::{self, MySqlItemRepository},
    ingest::{IngestionOrchestrator, RunScheduler},
    storage::S3Storage,
};

#[tokio::main]
async fn main() -> Result<()> {
    let log_config = LogConfig::builder()
        .log_file_prefix("media-cloner")
        .filter_directives("cloner_daemon=debug,sqlx=warn,aws_config=warn")
        .build()
        .merge_env()?;

    let _log_guard = init_logging(&log_config)?;

    info!("Starting media cloner");

    let config = Config::load()?;
    info!(
        "Configuration loaded - staging in {}",
        config.ingest.staging_dir.display()
    );

    let pool = db::connect(&config.db).await?;
    let store = S3Storage::new(&config.aws).await?;

    let orchestrator = IngestionOrchestrator::from_config(
        &config,
        Arc::new(MySqlItemRepository::new(pool.clone())),
        Arc::new(store),
    )?;

    let scheduler = RunScheduler::new(Arc::new(orchestrator), config.ingest.interval());
    let guard = scheduler.guard();
    let handle = scheduler.start();

    shutdown_signal().await;

    handle.abort();
    if guard.is_running() {
        info!("Waiting for the current run to finish");
    }
    let _lease = guard.acquire().await;

    info!("Closing database connection");
    pool.close().await;

    info!("Media cloner stopped");

    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
