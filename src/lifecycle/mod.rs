//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate (incl. qBittorrent login) → allowed / refused
//!
//! Shutdown (signals.rs):
//!     SIGINT/SIGTERM → watcher loop exits
//! ```

pub mod signals;
pub mod startup;

pub use startup::{preflight, StartupError};
