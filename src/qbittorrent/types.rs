//! Probe error definitions.

use thiserror::Error;

/// Errors that can occur while probing the torrent client.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// `qbittorrent.qbhost` is not configured.
    #[error("qbhost is not configured")]
    MissingHost,

    /// Host and port do not form a usable URL.
    #[error("Invalid WebUI address: {0}")]
    InvalidEndpoint(String),

    /// Connection refused, DNS failure, TLS failure and similar.
    #[error("Connection failed: {0}")]
    Transport(String),

    /// No response within the probe timeout.
    #[error("No response after {0} seconds")]
    Timeout(u64),

    /// The WebUI answered but refused the credentials.
    #[error("Login rejected: check qbusername and qbpassword")]
    Rejected,

    /// The WebUI has banned this address after too many failed logins.
    #[error("Login refused: this IP is banned by the WebUI")]
    Banned,

    #[error("Unexpected HTTP status {0}")]
    UnexpectedStatus(u16),
}

/// Result type for probe operations.
pub type ProbeResult<T> = Result<T, ProbeError>;
