//! Configuration document definitions.
//!
//! The five top-level sections are required; every leaf is optional so that
//! a missing or blank value reaches the validator instead of failing the
//! parse. Keys this core does not model are kept in each section's `extra`
//! map and written back on save.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

/// Root of the configuration document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ConfigDocument {
    /// Web UI, login and log output.
    pub app: AppSection,

    /// Media library paths.
    pub media: MediaSection,

    /// Torrent client connection and download paths.
    pub qbittorrent: QbittorrentSection,

    /// Notification channel.
    pub message: MessageSection,

    /// Transfer mode, metadata key, schedules and PT sites.
    pub pt: PtSection,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// `app` section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppSection {
    #[serde(deserialize_with = "lenient::number")]
    pub web_port: Option<u16>,

    #[serde(deserialize_with = "lenient::text")]
    pub login_user: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub login_password: Option<String>,

    /// Certificate path; HTTPS is served only when both cert and key are set.
    #[serde(deserialize_with = "lenient::text")]
    pub ssl_cert: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub ssl_key: Option<String>,

    /// `SERVER`, `FILE`, or anything else for console output.
    #[serde(deserialize_with = "lenient::text")]
    pub logtype: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub logserver: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub logpath: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Where log output goes, as selected by `app.logtype`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Server,
    File,
    Console,
}

impl AppSection {
    pub fn log_target(&self) -> LogTarget {
        match self.logtype.as_deref() {
            Some("SERVER") => LogTarget::Server,
            Some("FILE") => LogTarget::File,
            _ => LogTarget::Console,
        }
    }

    /// True when both the certificate and the key are configured.
    pub fn https_enabled(&self) -> bool {
        self.ssl_cert.is_some() && self.ssl_key.is_some()
    }
}

/// `media` section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MediaSection {
    #[serde(deserialize_with = "lenient::text")]
    pub movie_path: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub tv_path: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub hottrailer_path: Option<String>,

    /// ResilioSync share directories; each entry is checked on its own.
    #[serde(deserialize_with = "lenient::or_default")]
    pub resiliosync_path: Vec<Option<String>>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// `qbittorrent` section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct QbittorrentSection {
    /// Host name or full base URL of the WebUI.
    #[serde(deserialize_with = "lenient::text")]
    pub qbhost: Option<String>,

    #[serde(deserialize_with = "lenient::number")]
    pub qbport: Option<u16>,

    #[serde(deserialize_with = "lenient::text")]
    pub qbusername: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub qbpassword: Option<String>,

    /// Download directory as seen from this process.
    #[serde(deserialize_with = "lenient::text")]
    pub save_path: Option<String>,

    /// Download directory as seen from inside the client's container.
    #[serde(deserialize_with = "lenient::text")]
    pub save_containerpath: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// `message` section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MessageSection {
    /// `wechat`, `serverchan`, `telegram`, or empty.
    #[serde(deserialize_with = "lenient::text")]
    pub msg_channel: Option<String>,

    #[serde(deserialize_with = "lenient::or_default")]
    pub wechat: WechatConfig,

    #[serde(deserialize_with = "lenient::or_default")]
    pub serverchan: ServerChanConfig,

    #[serde(deserialize_with = "lenient::or_default")]
    pub telegram: TelegramConfig,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Active notification channel, parsed from `message.msg_channel`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageChannel {
    None,
    Wechat,
    ServerChan,
    Telegram,
    Unknown(String),
}

impl MessageSection {
    pub fn channel(&self) -> MessageChannel {
        match self.msg_channel.as_deref() {
            None => MessageChannel::None,
            Some("wechat") => MessageChannel::Wechat,
            Some("serverchan") => MessageChannel::ServerChan,
            Some("telegram") => MessageChannel::Telegram,
            Some(other) => MessageChannel::Unknown(other.to_string()),
        }
    }
}

/// WeChat Work application credentials.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WechatConfig {
    #[serde(deserialize_with = "lenient::text")]
    pub corpid: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub corpsecret: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub agentid: Option<String>,

    /// Callback token; only needed for menu control.
    #[serde(rename = "Token", deserialize_with = "lenient::text")]
    pub token: Option<String>,

    #[serde(rename = "EncodingAESKey", deserialize_with = "lenient::text")]
    pub encoding_aes_key: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerChanConfig {
    #[serde(deserialize_with = "lenient::text")]
    pub sckey: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TelegramConfig {
    #[serde(deserialize_with = "lenient::text")]
    pub telegram_token: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub telegram_chat_id: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// `pt` section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PtSection {
    /// `LINK` for hardlinks; any other value copies.
    #[serde(deserialize_with = "lenient::text")]
    pub rmt_mode: Option<String>,

    /// TMDB API key used for all metadata lookups.
    #[serde(deserialize_with = "lenient::text")]
    pub rmt_tmdbkey: Option<String>,

    /// Only download releases with a Chinese title.
    pub rss_chinese: Option<bool>,

    #[serde(deserialize_with = "lenient::text")]
    pub ptsignin_cron: Option<String>,

    /// Seconds a torrent is seeded before it is removed. May be fractional.
    #[serde(deserialize_with = "lenient::seconds")]
    pub pt_seeding_time: Option<f64>,

    /// Seconds between RSS checks.
    #[serde(deserialize_with = "lenient::seconds")]
    pub pt_check_interval: Option<f64>,

    #[serde(deserialize_with = "lenient::or_default")]
    pub sites: BTreeMap<String, SiteConfig>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// File transfer mode, parsed from `pt.rmt_mode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    Link,
    Copy,
}

impl PtSection {
    pub fn transfer_mode(&self) -> TransferMode {
        match self.rmt_mode.as_deref() {
            Some("LINK") => TransferMode::Link,
            _ => TransferMode::Copy,
        }
    }
}

/// One entry of `pt.sites`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    #[serde(deserialize_with = "lenient::text")]
    pub rssurl: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub signin_url: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub cookie: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Deserializers that accept the loose scalar typing of hand-edited YAML.
mod lenient {
    use std::str::FromStr;

    use serde::de::Error;
    use serde::{Deserialize, Deserializer};
    use serde_yaml::Value;

    /// Any scalar as text. Null and the empty string read as unset.
    pub fn text<'de, D>(d: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(d)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s.is_empty() => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(Value::Bool(b)) => Ok(Some(b.to_string())),
            Some(_) => Err(D::Error::custom("expected a scalar value")),
        }
    }

    /// An unsigned integer written either as a number or as a numeric string.
    pub fn number<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr + TryFrom<u64>,
    {
        match Option::<Value>::deserialize(d)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n
                .as_u64()
                .and_then(|v| T::try_from(v).ok())
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("{} is out of range", n))),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => s
                .trim()
                .parse::<T>()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("'{}' is not a number", s))),
            Some(_) => Err(D::Error::custom("expected a number")),
        }
    }

    /// A duration in seconds, integral or fractional, as a number or a numeric
    /// string. Range is left to the validator.
    pub fn seconds<'de, D>(d: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(d)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n
                .as_f64()
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("{} is not a number of seconds", n))),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("'{}' is not a number of seconds", s))),
            Some(_) => Err(D::Error::custom("expected a number of seconds")),
        }
    }

    /// A collection or group where an explicit `null` means empty.
    pub fn or_default<'de, D, T>(d: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
app:
  web_port: "3000"
  login_user: admin
  login_password: 123456
  logtype: FILE
  logpath: /var/log/nastool
media:
  movie_path: /media/movies
  tv_path: /media/tv
  hottrailer_path: ""
  resiliosync_path:
    - /media/sync
    -
qbittorrent:
  qbhost: 192.168.1.10
  qbport: 8080
  qbusername: admin
  qbpassword: adminadmin
  save_path: /downloads
message:
  msg_channel: wechat
  wechat:
    corpid: ww1234
    agentid: 1000002
    Token:
pt:
  rmt_mode: LINK
  rmt_tmdbkey: abc
  pt_seeding_time: "86400"
  sites:
    hdsky:
      rssurl: https://hdsky.me/rss
      cookie: uid=1
douban:
  users: [1, 2]
"#;

    #[test]
    fn test_lenient_scalars() {
        let doc: ConfigDocument = serde_yaml::from_str(SAMPLE).unwrap();

        assert_eq!(doc.app.web_port, Some(3000));
        assert_eq!(doc.app.login_password.as_deref(), Some("123456"));
        assert_eq!(doc.app.log_target(), LogTarget::File);
        assert!(!doc.app.https_enabled());
        assert_eq!(doc.media.hottrailer_path, None);
        assert_eq!(doc.media.resiliosync_path, vec![Some("/media/sync".to_string()), None]);
        assert_eq!(doc.message.wechat.agentid.as_deref(), Some("1000002"));
        assert_eq!(doc.message.wechat.token, None);
        assert_eq!(doc.pt.pt_seeding_time, Some(86_400.0));
        assert_eq!(doc.pt.transfer_mode(), TransferMode::Link);
    }

    #[test]
    fn test_unknown_keys_are_kept() {
        let doc: ConfigDocument = serde_yaml::from_str(SAMPLE).unwrap();
        assert!(doc.extra.contains_key("douban"));
    }

    #[test]
    fn test_missing_section_is_rejected() {
        let yaml = "app: {}\nmedia: {}\nqbittorrent: {}\nmessage: {}\n";
        let result: Result<ConfigDocument, _> = serde_yaml::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_null_groups_read_as_empty() {
        let yaml = "app: {}\nmedia:\n  resiliosync_path:\nqbittorrent: {}\nmessage:\n  wechat:\npt:\n  sites:\n";
        let doc: ConfigDocument = serde_yaml::from_str(yaml).unwrap();
        assert!(doc.media.resiliosync_path.is_empty());
        assert!(doc.pt.sites.is_empty());
        assert_eq!(doc.message.wechat, WechatConfig::default());
    }

    #[test]
    fn test_channel_and_mode_parsing() {
        let mut message = MessageSection::default();
        assert_eq!(message.channel(), MessageChannel::None);
        message.msg_channel = Some("telegram".into());
        assert_eq!(message.channel(), MessageChannel::Telegram);
        message.msg_channel = Some("bark".into());
        assert_eq!(message.channel(), MessageChannel::Unknown("bark".into()));

        let pt = PtSection {
            rmt_mode: Some("COPY".into()),
            ..Default::default()
        };
        assert_eq!(pt.transfer_mode(), TransferMode::Copy);
        assert_eq!(PtSection::default().transfer_mode(), TransferMode::Copy);
    }

    #[test]
    fn test_fractional_seconds_are_accepted() {
        let yaml = "app: {}\nmedia: {}\nqbittorrent: {}\nmessage: {}\npt:\n  pt_seeding_time: 3600.5\n  pt_check_interval: \"90.25\"\n";
        let doc: ConfigDocument = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(doc.pt.pt_seeding_time, Some(3600.5));
        assert_eq!(doc.pt.pt_check_interval, Some(90.25));
    }

    #[test]
    fn test_fractional_port_is_a_parse_error() {
        let yaml = "app:\n  web_port: 3000.5\nmedia: {}\nqbittorrent: {}\nmessage: {}\npt: {}\n";
        let result: Result<ConfigDocument, _> = serde_yaml::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_port_is_a_parse_error() {
        let yaml = "app:\n  web_port: seventy\nmedia: {}\nqbittorrent: {}\nmessage: {}\npt: {}\n";
        let result: Result<ConfigDocument, _> = serde_yaml::from_str(yaml);
        assert!(result.is_err());
    }
}
