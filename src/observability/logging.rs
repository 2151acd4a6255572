//! Structured logging.
//!
//! Where logs end up (terminal, file, log server) is decided by the
//! deployment; this only installs a `tracing` subscriber writing to stderr.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::constants::LOG_LEVEL;

/// Install the global subscriber. `RUST_LOG` overrides the default level.
pub fn init() {
    init_with_default(LOG_LEVEL);
}

pub fn init_with_default(directive: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| directive.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
