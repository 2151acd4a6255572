//! Media classification tables and fixed scheduling values.
//!
//! These are compiled in and never read from the config document. Transfer,
//! RSS and trailer logic depend on the exact values below.

use std::time::Duration;

/// Movie category directories.
pub const RMT_MOVIETYPE: [&str; 3] = ["华语电影", "外语电影", "精选"];

/// Directory that starred media is moved into.
pub const RMT_FAVTYPE: &str = "精选";

/// TV category directories.
pub const RMT_TVTYPE: [&str; 7] = ["国产剧", "欧美剧", "日韩剧", "动漫", "纪录片", "综艺", "儿童"];

/// Supported media file extensions.
pub const RMT_MEDIAEXT: [&str; 4] = [".mp4", ".mkv", ".ts", ".iso"];

/// Supported subtitle file extensions.
pub const RMT_SUBEXT: [&str; 2] = [".srt", ".ass"];

/// Country codes whose shows go to the Europe/America TV bucket.
pub const RMT_COUNTRY_EA: [&str; 10] = ["US", "FR", "GB", "DE", "ES", "IT", "NL", "PT", "RU", "UK"];

/// Country codes whose shows go to the Japan/Korea TV bucket.
pub const RMT_COUNTRY_AS: [&str; 6] = ["JP", "KP", "KR", "TH", "IN", "SG"];

/// Transfers stop when free disk space drops below this many gigabytes.
pub const RMT_DISKFREESIZE: u64 = 10;

/// WeChat app menu id to bot command.
pub const WECHAT_MENU: [(&str, &str); 7] = [
    ("_0_0", "/qbt"),
    ("_0_1", "/qbr"),
    ("_0_2", "/rss"),
    ("_0_3", "/hotm"),
    ("_0_4", "/mrt"),
    ("_1_0", "/rst"),
    ("_2_0", "/pts"),
];

/// Trailer download command. `$PATH` and `$KEY` are substituted by the caller.
pub const YOUTUBE_DL_CMD: &str = r#"youtube-dl -o "$PATH" "https://www.youtube.com/watch?v=$KEY""#;

pub const AUTO_REMOVE_TORRENTS_INTERVAL: Duration = Duration::from_secs(600);
pub const HOT_TRAILER_INTERVAL: Duration = Duration::from_secs(86_400);
/// Trailers inspected per hot-trailer run.
pub const HOT_TRAILER_INTERVAL_TOTAL: usize = 100;
pub const QBITTORRENT_TRANSFER_INTERVAL: Duration = Duration::from_secs(300);

/// Default filter directive for the log subscriber.
pub const LOG_LEVEL: &str = "info";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_sets_are_disjoint() {
        for code in RMT_COUNTRY_EA {
            assert!(!RMT_COUNTRY_AS.contains(&code), "{} in both sets", code);
        }
    }

    #[test]
    fn test_extension_sets_are_disjoint() {
        for ext in RMT_MEDIAEXT {
            assert!(!RMT_SUBEXT.contains(&ext));
        }
    }

    #[test]
    fn test_favorite_is_a_movie_type() {
        assert!(RMT_MOVIETYPE.contains(&RMT_FAVTYPE));
    }

    #[test]
    fn test_regional_tv_types_exist() {
        assert!(RMT_TVTYPE.contains(&"欧美剧"));
        assert!(RMT_TVTYPE.contains(&"日韩剧"));
    }

    #[test]
    fn test_extensions_are_dotted_lowercase() {
        for ext in RMT_MEDIAEXT.iter().chain(RMT_SUBEXT.iter()) {
            assert!(ext.starts_with('.'));
            assert_eq!(*ext, ext.to_ascii_lowercase());
        }
    }

    #[test]
    fn test_wechat_menu_ids_are_unique() {
        for (i, (id, _)) in WECHAT_MENU.iter().enumerate() {
            assert!(WECHAT_MENU[i + 1..].iter().all(|(other, _)| other != id), "{} repeated", id);
        }
        assert!(WECHAT_MENU.iter().all(|(_, cmd)| cmd.starts_with('/')));
    }
}
