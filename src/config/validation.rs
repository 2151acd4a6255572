//! Startup configuration checks.
//!
//! # Responsibilities
//! - Walk the document section by section: app, media, qbittorrent, message, pt
//! - Separate fatal problems (startup refused) from soft ones (one feature off)
//! - Probe the torrent client with the configured credentials
//!
//! # Design Decisions
//! - Every check runs; one fatal finding never hides the next one
//! - Each finding is logged the moment it is recorded
//! - The document is never modified

use std::fmt;
use std::path::Path;

use crate::config::schema::{
    AppSection, ConfigDocument, LogTarget, MediaSection, MessageChannel, MessageSection,
    PtSection, QbittorrentSection, TransferMode,
};
use crate::qbittorrent::{QbEndpoint, TorrentClientProbe};

/// Top-level document section a finding belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    App,
    Media,
    Qbittorrent,
    Message,
    Pt,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::App => "app",
            Section::Media => "media",
            Section::Qbittorrent => "qbittorrent",
            Section::Message => "message",
            Section::Pt => "pt",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Confirmation of an active setting.
    Info,
    /// A feature is disabled; startup continues.
    Warning,
    /// Logged as an error, but startup continues.
    Degraded,
    /// Startup must be refused.
    Fatal,
}

/// Capability switched off by a soft finding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Feature {
    /// Log shipping or file logging.
    Logging,
    HotTrailer,
    /// ResilioSync for the entry at this index of `resiliosync_path`.
    ResilioSync(usize),
    /// Transfers from a containerized torrent client.
    ContainerTransfer,
    Notifications,
    /// WeChat menu commands.
    WechatControl,
    /// Scheduled sign-in across all sites.
    Signin,
    AutoRemove,
    RssCheck,
    /// RSS downloads for one site.
    SiteRss(String),
    /// Automatic sign-in for one site.
    SiteSignin(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub section: Section,
    /// Dotted field path within the section, e.g. `sites.hdsky.cookie`.
    pub field: String,
    pub severity: Severity,
    pub message: String,
    pub disabled: Option<Feature>,
}

/// Everything one validation pass found, in the order it was found.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    findings: Vec<Finding>,
}

impl ValidationReport {
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn fatal(&self) -> impl Iterator<Item = &Finding> {
        self.with_severity(Severity::Fatal)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.with_severity(Severity::Warning)
    }

    pub fn disabled_features(&self) -> impl Iterator<Item = &Feature> {
        self.findings.iter().filter_map(|f| f.disabled.as_ref())
    }

    pub fn is_disabled(&self, feature: &Feature) -> bool {
        self.disabled_features().any(|f| f == feature)
    }

    /// True when no fatal finding was recorded.
    pub fn startup_allowed(&self) -> bool {
        self.fatal().next().is_none()
    }

    fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.severity == severity)
    }

    fn info(&mut self, section: Section, field: &str, message: String) {
        self.record(section, field, Severity::Info, message, None);
    }

    fn warn(&mut self, section: Section, field: &str, feature: Feature, message: String) {
        self.record(section, field, Severity::Warning, message, Some(feature));
    }

    fn degraded(&mut self, section: Section, field: &str, feature: Feature, message: String) {
        self.record(section, field, Severity::Degraded, message, Some(feature));
    }

    fn fatal_finding(&mut self, section: Section, field: &str, message: String) {
        self.record(section, field, Severity::Fatal, message, None);
    }

    fn record(
        &mut self,
        section: Section,
        field: &str,
        severity: Severity,
        message: String,
        disabled: Option<Feature>,
    ) {
        let finding = Finding {
            section,
            field: field.to_string(),
            severity,
            message,
            disabled,
        };
        emit(&finding);
        self.findings.push(finding);
    }
}

fn emit(finding: &Finding) {
    let section = finding.section;
    let field = finding.field.as_str();
    match finding.severity {
        Severity::Info => tracing::info!(%section, field, "{}", finding.message),
        Severity::Warning => tracing::warn!(%section, field, "{}", finding.message),
        Severity::Degraded => tracing::error!(%section, field, fatal = false, "{}", finding.message),
        Severity::Fatal => tracing::error!(%section, field, fatal = true, "{}", finding.message),
    }
}

/// Runs the full check pass with a given torrent client probe.
pub struct Validator<P> {
    probe: P,
}

impl<P: TorrentClientProbe> Validator<P> {
    pub fn new(probe: P) -> Self {
        Self { probe }
    }

    pub fn run(&self, doc: &ConfigDocument) -> ValidationReport {
        let mut report = ValidationReport::default();

        check_app(&doc.app, &mut report);
        check_media(&doc.media, &mut report);
        self.check_qbittorrent(&doc.qbittorrent, &mut report);
        check_message(&doc.message, &mut report);
        check_pt(&doc.pt, &mut report);

        tracing::info!(
            fatal = report.fatal().count(),
            warnings = report.warnings().count(),
            startup_allowed = report.startup_allowed(),
            "Configuration check finished"
        );
        report
    }

    fn check_qbittorrent(&self, qb: &QbittorrentSection, report: &mut ValidationReport) {
        let s = Section::Qbittorrent;

        let probed = QbEndpoint::from_section(qb)
            .and_then(|endpoint| self.probe.authenticate(&endpoint).map(|()| endpoint));
        match probed {
            Ok(endpoint) => report.info(
                s,
                "qbhost",
                format!("qBittorrent login succeeded at {}", endpoint.base_url),
            ),
            Err(e) => report.fatal_finding(
                s,
                "qbhost",
                format!("qBittorrent is unreachable, check the configuration: {}", e),
            ),
        }

        require_dir(report, s, "save_path", qb.save_path.as_deref());

        if qb.save_containerpath.is_none() {
            report.warn(
                s,
                "save_containerpath",
                Feature::ContainerTransfer,
                "save_containerpath is not set; it is required when qBittorrent runs in a container, otherwise files cannot be transferred".to_string(),
            );
        }
    }
}

/// Validate `doc`, probing the torrent client through `probe`.
///
/// Returns true when startup may proceed. All findings have been logged by
/// the time this returns.
pub fn check_config<P: TorrentClientProbe>(doc: &ConfigDocument, probe: &P) -> bool {
    Validator::new(probe).run(doc).startup_allowed()
}

fn check_app(app: &AppSection, report: &mut ValidationReport) {
    let s = Section::App;

    let logtype = app.logtype.as_deref().unwrap_or("console");
    report.info(s, "logtype", format!("Log output type: {}", logtype));
    match app.log_target() {
        LogTarget::Server => match app.logserver.as_deref() {
            Some(server) => report.info(s, "logserver", format!("Logs will be sent to {}", server)),
            None => report.degraded(
                s,
                "logserver",
                Feature::Logging,
                "logserver is not set, logs cannot be delivered".to_string(),
            ),
        },
        LogTarget::File => match app.logpath.as_deref() {
            Some(path) => report.info(s, "logpath", format!("Logs will be written to {}", path)),
            None => report.degraded(
                s,
                "logpath",
                Feature::Logging,
                "logpath is not set, logs cannot be written".to_string(),
            ),
        },
        LogTarget::Console => {
            report.info(s, "logtype", "Logs will be written to the terminal".to_string())
        }
    }

    let port = app.web_port.filter(|p| *p != 0);
    match port {
        Some(port) => report.info(s, "web_port", format!("Web UI listening on port {}", port)),
        None => report.fatal_finding(s, "web_port", "web_port is not set, cannot start".to_string()),
    }

    match (app.login_user.as_deref(), app.login_password.as_deref()) {
        (Some(user), Some(_)) => report.info(s, "login_user", format!("Web UI login user: {}", user)),
        _ => report.fatal_finding(
            s,
            "login_user",
            "login_user or login_password is not set, cannot start".to_string(),
        ),
    }

    let port_text = port.map_or_else(|| "?".to_string(), |p| p.to_string());
    if app.https_enabled() {
        report.info(
            s,
            "ssl_cert",
            format!("HTTPS enabled, open https://IP:{} to manage", port_text),
        );
    } else {
        report.info(
            s,
            "ssl_cert",
            format!("HTTPS not enabled, open http://IP:{} to manage", port_text),
        );
    }
}

fn check_media(media: &MediaSection, report: &mut ValidationReport) {
    let s = Section::Media;

    require_dir(report, s, "movie_path", media.movie_path.as_deref());
    require_dir(report, s, "tv_path", media.tv_path.as_deref());

    match media.hottrailer_path.as_deref() {
        None => report.warn(
            s,
            "hottrailer_path",
            Feature::HotTrailer,
            "hottrailer_path is not set, trailer downloads are disabled".to_string(),
        ),
        Some(path) if !Path::new(path).exists() => report.warn(
            s,
            "hottrailer_path",
            Feature::HotTrailer,
            format!("hottrailer_path does not exist, trailer downloads are disabled: {}", path),
        ),
        Some(_) => {}
    }

    for (index, entry) in media.resiliosync_path.iter().enumerate() {
        let field = format!("resiliosync_path[{}]", index);
        match entry.as_deref().filter(|p| !p.is_empty()) {
            None => report.warn(
                s,
                &field,
                Feature::ResilioSync(index),
                "resiliosync_path entry is empty, ResilioSync sync is disabled for it".to_string(),
            ),
            Some(path) if !Path::new(path).exists() => report.warn(
                s,
                &field,
                Feature::ResilioSync(index),
                format!("resiliosync_path does not exist, ResilioSync sync is disabled for it: {}", path),
            ),
            Some(_) => {}
        }
    }
}

fn check_message(message: &MessageSection, report: &mut ValidationReport) {
    let s = Section::Message;

    match message.channel() {
        MessageChannel::None => report.warn(
            s,
            "msg_channel",
            Feature::Notifications,
            "msg_channel is not set, no notifications will be sent".to_string(),
        ),
        MessageChannel::Wechat => {
            let wechat = &message.wechat;
            if wechat.corpid.is_none() || wechat.corpsecret.is_none() || wechat.agentid.is_none() {
                report.warn(
                    s,
                    "wechat",
                    Feature::Notifications,
                    "wechat is incomplete (corpid, corpsecret, agentid), no notifications will be sent".to_string(),
                );
            }
            if wechat.token.is_none() || wechat.encoding_aes_key.is_none() {
                report.warn(
                    s,
                    "wechat",
                    Feature::WechatControl,
                    "wechat is incomplete (Token, EncodingAESKey), WeChat menu control is disabled".to_string(),
                );
            }
        }
        MessageChannel::ServerChan => {
            if message.serverchan.sckey.is_none() {
                report.warn(
                    s,
                    "serverchan.sckey",
                    Feature::Notifications,
                    "serverchan is incomplete, no notifications will be sent".to_string(),
                );
            }
        }
        MessageChannel::Telegram => {
            let telegram = &message.telegram;
            if telegram.telegram_token.is_none() || telegram.telegram_chat_id.is_none() {
                report.warn(
                    s,
                    "telegram",
                    Feature::Notifications,
                    "telegram is incomplete, no notifications will be sent".to_string(),
                );
            }
        }
        MessageChannel::Unknown(other) => report.warn(
            s,
            "msg_channel",
            Feature::Notifications,
            format!("msg_channel '{}' is not supported, no notifications will be sent", other),
        ),
    }
}

fn check_pt(pt: &PtSection, report: &mut ValidationReport) {
    let s = Section::Pt;

    match pt.transfer_mode() {
        TransferMode::Link => report.info(s, "rmt_mode", "File transfer mode: hardlink".to_string()),
        TransferMode::Copy => report.info(s, "rmt_mode", "File transfer mode: copy".to_string()),
    }

    if pt.rmt_tmdbkey.is_none() {
        report.fatal_finding(s, "rmt_tmdbkey", "rmt_tmdbkey is not set, cannot start".to_string());
    }

    if pt.rss_chinese == Some(true) {
        report.info(
            s,
            "rss_chinese",
            "Only releases with a Chinese title will be downloaded".to_string(),
        );
    }

    if pt.ptsignin_cron.is_none() {
        report.warn(
            s,
            "ptsignin_cron",
            Feature::Signin,
            "ptsignin_cron is not set, PT site sign-in is disabled".to_string(),
        );
    }

    match pt.pt_seeding_time.filter(|t| positive_seconds(*t)) {
        Some(secs) => report.info(
            s,
            "pt_seeding_time",
            format!("PT seeding time: {:.1} hours", secs / 3600.0),
        ),
        None => report.warn(
            s,
            "pt_seeding_time",
            Feature::AutoRemove,
            "pt_seeding_time is not set, automatic torrent removal is disabled".to_string(),
        ),
    }

    if pt.pt_check_interval.filter(|t| positive_seconds(*t)).is_none() {
        report.warn(
            s,
            "pt_check_interval",
            Feature::RssCheck,
            "pt_check_interval is not set, PT resources will not be checked automatically".to_string(),
        );
    }

    for (name, site) in &pt.sites {
        if site.rssurl.is_none() {
            report.warn(
                s,
                &format!("sites.{}.rssurl", name),
                Feature::SiteRss(name.clone()),
                format!("{}: rssurl is not set, RSS downloads for this site are disabled", name),
            );
        }
        if site.signin_url.is_none() {
            report.warn(
                s,
                &format!("sites.{}.signin_url", name),
                Feature::SiteSignin(name.clone()),
                format!("{}: signin_url is not set, sign-in for this site is disabled", name),
            );
        }
        if site.cookie.is_none() {
            report.warn(
                s,
                &format!("sites.{}.cookie", name),
                Feature::SiteSignin(name.clone()),
                format!("{}: cookie is not set, sign-in for this site is disabled", name),
            );
        }
    }
}

fn positive_seconds(secs: f64) -> bool {
    secs.is_finite() && secs > 0.0
}

/// A directory the program cannot run without.
fn require_dir(report: &mut ValidationReport, section: Section, field: &str, value: Option<&str>) {
    match value {
        None => report.fatal_finding(section, field, format!("{} is not set, cannot start", field)),
        Some(path) if !Path::new(path).exists() => report.fatal_finding(
            section,
            field,
            format!("{} does not exist, cannot start: {}", field, path),
        ),
        Some(_) => {}
    }
}
