//! Observability subsystem.
//!
//! Every module logs through the `tracing` macros; `logging.rs` installs
//! the subscriber once per process.

pub mod logging;
