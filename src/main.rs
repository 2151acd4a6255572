//! nastool daemon entry point.
//!
//! ```text
//!   $NASTOOL_CONFIG ──▶ ConfigStore ──▶ preflight ──▶ refused: exit 1
//!                            ▲              │
//!                            │              ▼ allowed
//!                        watcher ◀── reload & re-check latest until SIGINT/SIGTERM
//! ```

use std::sync::Arc;

use nastool::config::watcher::{latest_update, ConfigWatcher};
use nastool::config::{ConfigDocument, ConfigStore, Validator};
use nastool::lifecycle::{preflight, signals};
use nastool::observability::logging;
use nastool::qbittorrent::QbittorrentClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    tracing::info!("nastool v{} starting", env!("CARGO_PKG_VERSION"));

    let store = Arc::new(ConfigStore::from_env()?);
    tracing::info!(path = ?store.path(), "Configuration file");

    // The probe and the path checks block.
    let gate_store = Arc::clone(&store);
    let config = tokio::task::spawn_blocking(move || {
        preflight(&gate_store, &QbittorrentClient::new())
    })
    .await??;

    tracing::info!(
        web_port = ?config.app.web_port,
        sites = config.pt.sites.len(),
        "Startup checks passed"
    );

    let (watcher, mut updates) = ConfigWatcher::new(Arc::clone(&store));
    let _watcher = watcher.run()?;

    let shutdown = signals::shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            Some(doc) = updates.recv() => {
                // One re-check at a time, against the newest snapshot only.
                recheck(latest_update(doc, &mut updates)).await;
            }
            _ = &mut shutdown => break,
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Re-run the checks on a reloaded snapshot so problems show up in the log.
async fn recheck(doc: Arc<ConfigDocument>) {
    let result = tokio::task::spawn_blocking(move || {
        Validator::new(QbittorrentClient::new())
            .run(&doc)
            .startup_allowed()
    })
    .await;

    match result {
        Ok(true) => tracing::info!("Reloaded configuration passed all checks"),
        Ok(false) => tracing::error!("Reloaded configuration has fatal problems, see errors above"),
        Err(e) => tracing::error!(error = %e, "Configuration re-check did not complete"),
    }
}
