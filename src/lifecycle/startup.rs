//! Startup gate.
//!
//! # Responsibilities
//! - Take the current snapshot from the store
//! - Run the full configuration check against it
//! - Refuse startup on any fatal finding
//!
//! # Design Decisions
//! - Blocking; async callers run it on a blocking thread
//! - Findings are already logged when the gate returns

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::config::schema::ConfigDocument;
use crate::config::store::ConfigStore;
use crate::config::validation::Validator;
use crate::qbittorrent::TorrentClientProbe;

#[derive(Debug, Error)]
pub enum StartupError {
    /// The store has never loaded a document.
    #[error("No configuration loaded from {0}")]
    NoConfig(PathBuf),

    #[error("Configuration check failed with {fatal} fatal problem(s)")]
    Rejected { fatal: usize },
}

/// Validate the store's current snapshot and return it if startup may proceed.
pub fn preflight<P: TorrentClientProbe>(
    store: &ConfigStore,
    probe: P,
) -> Result<Arc<ConfigDocument>, StartupError> {
    let doc = store
        .get_config()
        .ok_or_else(|| StartupError::NoConfig(store.path().to_path_buf()))?;

    let report = Validator::new(probe).run(&doc);
    if report.startup_allowed() {
        Ok(doc)
    } else {
        Err(StartupError::Rejected {
            fatal: report.fatal().count(),
        })
    }
}
