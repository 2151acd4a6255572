//! qBittorrent WebUI login probe.
//!
//! # Responsibilities
//! - Build the WebUI base URL from the `qbittorrent` section
//! - Perform one authenticated login against `/api/v2/auth/login`
//! - Map transport, auth and status failures to [`ProbeError`]
//!
//! # Design Decisions
//! - Blocking client; this runs once during startup on the calling thread
//! - Bounded timeout so an unreachable host cannot stall startup
//! - No retries at this layer

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::REFERER;
use reqwest::StatusCode;

use crate::config::schema::QbittorrentSection;
use crate::qbittorrent::types::{ProbeError, ProbeResult};

/// Default bound for the whole login request.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

const LOGIN_PATH: &str = "/api/v2/auth/login";

/// Connection details for one qBittorrent WebUI.
#[derive(Clone, PartialEq, Eq)]
pub struct QbEndpoint {
    /// Base URL without trailing slash, e.g. `http://10.0.0.2:8080`.
    pub base_url: String,
    pub username: String,
    pub password: String,
}

impl QbEndpoint {
    pub fn from_section(section: &QbittorrentSection) -> ProbeResult<Self> {
        let host = section
            .qbhost
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .ok_or(ProbeError::MissingHost)?;

        let mut base_url = if host.contains("://") {
            host.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", host.trim_end_matches('/'))
        };
        if let Some(port) = section.qbport {
            base_url = format!("{}:{}", base_url, port);
        }

        Ok(Self {
            base_url,
            username: section.qbusername.clone().unwrap_or_default(),
            password: section.qbpassword.clone().unwrap_or_default(),
        })
    }

    pub fn login_url(&self) -> String {
        format!("{}{}", self.base_url, LOGIN_PATH)
    }
}

impl std::fmt::Debug for QbEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QbEndpoint")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// One-shot connectivity and credential check against a torrent client.
pub trait TorrentClientProbe {
    fn authenticate(&self, endpoint: &QbEndpoint) -> ProbeResult<()>;
}

impl<P: TorrentClientProbe + ?Sized> TorrentClientProbe for &P {
    fn authenticate(&self, endpoint: &QbEndpoint) -> ProbeResult<()> {
        (**self).authenticate(endpoint)
    }
}

/// Probe backed by the qBittorrent WebUI API.
#[derive(Debug, Clone)]
pub struct QbittorrentClient {
    timeout: Duration,
}

impl QbittorrentClient {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_PROBE_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn http_client(&self) -> ProbeResult<Client> {
        Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.timeout)
            // WebUIs behind self-signed certificates are common on home servers.
            .danger_accept_invalid_certs(true)
            .no_proxy()
            .build()
            .map_err(|e| ProbeError::Transport(e.to_string()))
    }
}

impl Default for QbittorrentClient {
    fn default() -> Self {
        Self::new()
    }
}

impl TorrentClientProbe for QbittorrentClient {
    fn authenticate(&self, endpoint: &QbEndpoint) -> ProbeResult<()> {
        let url = reqwest::Url::parse(&endpoint.login_url())
            .map_err(|e| ProbeError::InvalidEndpoint(format!("{}: {}", endpoint.base_url, e)))?;

        let response = self
            .http_client()?
            .post(url)
            // The WebUI rejects logins whose Referer does not match its own origin.
            .header(REFERER, endpoint.base_url.as_str())
            .form(&[
                ("username", endpoint.username.as_str()),
                ("password", endpoint.password.as_str()),
            ])
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    ProbeError::Timeout(self.timeout.as_secs())
                } else {
                    ProbeError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::FORBIDDEN {
            return Err(ProbeError::Banned);
        }
        if !status.is_success() {
            return Err(ProbeError::UnexpectedStatus(status.as_u16()));
        }

        let body = response
            .text()
            .map_err(|e| ProbeError::Transport(e.to_string()))?;
        match body.trim() {
            "Ok." => {
                tracing::debug!(base_url = %endpoint.base_url, "qBittorrent login accepted");
                Ok(())
            }
            _ => Err(ProbeError::Rejected),
        }
    }
}
