//! Torrent client integration.
//!
//! Only the login handshake lives here; it is the startup gate for the
//! `qbittorrent` config section.

pub mod client;
pub mod types;

pub use client::{QbEndpoint, QbittorrentClient, TorrentClientProbe, DEFAULT_PROBE_TIMEOUT};
pub use types::{ProbeError, ProbeResult};
