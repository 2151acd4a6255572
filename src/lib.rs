//! nastool configuration core.
//!
//! Loads the YAML config named by `NASTOOL_CONFIG`, keeps it as the single
//! process-wide snapshot, and decides at startup whether the configuration
//! is good enough to run.

pub mod config;
pub mod constants;
pub mod lifecycle;
pub mod observability;
pub mod qbittorrent;

pub use config::{check_config, ConfigDocument, ConfigStore, ValidationReport, Validator};
pub use lifecycle::preflight;
pub use qbittorrent::QbittorrentClient;
