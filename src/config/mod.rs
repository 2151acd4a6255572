//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! $NASTOOL_CONFIG (YAML)
//!     → loader.rs (parse & deserialize)
//!     → store.rs (cached Arc<ConfigDocument>, atomic swap on reload)
//!     → validation.rs (startup checks, torrent client probe)
//!     → startup allowed / refused
//!
//! On file change:
//!     watcher.rs detects change
//!     → store.rs reloads; a broken file keeps the previous snapshot
//!     → new snapshot sent to subscribers
//! ```
//!
//! # Design Decisions
//! - A snapshot is immutable; changes require a full reload
//! - Sections are required, leaf values are optional and checked by validation.rs
//! - `save` writes the file only; the cache changes on the next load

pub mod loader;
pub mod schema;
pub mod store;
pub mod validation;
pub mod watcher;

pub use loader::{ConfigError, CONFIG_PATH_VAR};
pub use schema::{
    AppSection, ConfigDocument, MediaSection, MessageSection, PtSection, QbittorrentSection,
    SiteConfig,
};
pub use store::ConfigStore;
pub use validation::{check_config, Feature, Severity, ValidationReport, Validator};
