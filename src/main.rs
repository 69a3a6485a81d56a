use anyhow::Result;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use tracing::{error, info};

use nvd_mirror::config::Config;
use nvd_mirror::feed::client::FeedClient;
use nvd_mirror::server::api::AppState;
use nvd_mirror::storage::{CveStore, Database};
use nvd_mirror::sync::{SyncController, SyncScheduler, SyncStatus};
use nvd_mirror::{logging, server};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_args();

    logging::init(&config.log_format, &config.log_level);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        feed_url = %config.feed_url,
        port = config.server_port,
        storage_path = %config.storage_path,
        "nvd-mirror starting"
    );

    if let Err(e) = config.validate() {
        error!(error = %e, "Configuration validation failed");
        std::process::exit(1);
    }

    // Initialize database
    let db = Arc::new(Database::new(&config.get_db_path())?);

    // Wire the sync pipeline
    let sync_status = Arc::new(SyncStatus::new());
    let feed = Arc::new(FeedClient::new(
        config.feed_url.clone(),
        config.request_timeout_secs,
    )?);
    let controller = Arc::new(SyncController::new(
        feed,
        db.clone() as Arc<dyn CveStore>,
        config.page_size,
        sync_status.clone(),
    ));

    // Create shutdown channel
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    // Start the refresh trigger: initial run plus fixed cadence
    let scheduler = SyncScheduler::new(
        controller.clone(),
        config.sync_interval_secs,
        config.sync_on_start,
    );
    let scheduler_shutdown = shutdown_rx.clone();
    let scheduler_handle = tokio::spawn(async move {
        scheduler.run(scheduler_shutdown).await;
    });

    let state = AppState {
        db,
        controller,
        sync_status,
        ready: Arc::new(AtomicBool::new(false)),
    };

    // Serve until ctrl-c
    let result = tokio::select! {
        result = server::run(config.server_port, state, shutdown_rx) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
            let _ = shutdown_tx.send(true);
            Ok(())
        }
    };

    if let Err(e) = result {
        error!(error = %e, "Application error");
        std::process::exit(1);
    }

    let _ = scheduler_handle.await;

    info!("Shutdown complete");
    Ok(())
}
