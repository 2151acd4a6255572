//! Configuration file watcher for full reloads.

use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::schema::ConfigDocument;
use crate::config::store::ConfigStore;

/// Reloads a [`ConfigStore`] whenever its backing file changes.
pub struct ConfigWatcher {
    store: Arc<ConfigStore>,
    update_tx: mpsc::UnboundedSender<Arc<ConfigDocument>>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for each snapshot that reloaded
    /// successfully.
    pub fn new(store: Arc<ConfigStore>) -> (Self, mpsc::UnboundedReceiver<Arc<ConfigDocument>>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        (Self { store, update_tx }, update_rx)
    }

    /// Start watching. Events are delivered on notify's own thread.
    ///
    /// Dropping the returned watcher stops the reloads.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx;
        let store = Arc::clone(&self.store);

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!("Config file change detected, reloading...");
                        // A failed load keeps the current snapshot and is logged by the store.
                        if let Ok(doc) = store.load() {
                            let _ = tx.send(doc);
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(self.store.path(), RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.store.path(), "Config watcher started");
        Ok(watcher)
    }
}

/// Skip past snapshots already queued behind `first` and return the newest.
///
/// A single save usually fires several file events, each of which publishes
/// a snapshot; consumers only need to act on the last one.
pub fn latest_update(
    first: Arc<ConfigDocument>,
    updates: &mut mpsc::UnboundedReceiver<Arc<ConfigDocument>>,
) -> Arc<ConfigDocument> {
    let mut latest = first;
    while let Ok(next) = updates.try_recv() {
        latest = next;
    }
    latest
}
