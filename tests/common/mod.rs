//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::fs;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::path::{Path, PathBuf};
use std::thread;

/// Start a mock qBittorrent WebUI that answers every request with a fixed
/// status and body. Returns the bound address.
pub fn start_mock_qbittorrent(status: u16, body: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut socket) = stream else { break };
            read_request(&mut socket);

            let status_text = match status {
                200 => "200 OK",
                403 => "403 Forbidden",
                500 => "500 Internal Server Error",
                _ => "200 OK",
            };
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: text/plain; charset=UTF-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_text,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes());
            let _ = socket.flush();
        }
    });

    addr
}

/// An address nothing is listening on.
pub fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Consume headers and body so the client sees a clean response.
fn read_request(socket: &mut impl Read) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let Ok(n) = socket.read(&mut chunk) else { return };
        if n == 0 {
            return;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = find(&buf, b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let length = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                return;
            }
        }
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Create the media and download directories under `root` and write a
/// complete config file pointing at them and at `qb`.
pub fn write_config(root: &Path, qb: SocketAddr) -> PathBuf {
    for dir in ["movies", "tv", "trailers", "sync", "downloads"] {
        fs::create_dir_all(root.join(dir)).unwrap();
    }
    let p = |name: &str| root.join(name).to_string_lossy().into_owned();

    let yaml = format!(
        r#"app:
  web_port: 3000
  login_user: admin
  login_password: password
  ssl_cert: ""
  ssl_key: ""
  logtype: CONSOLE
media:
  movie_path: "{movies}"
  tv_path: "{tv}"
  hottrailer_path: "{trailers}"
  resiliosync_path:
    - "{sync}"
qbittorrent:
  qbhost: "{host}"
  qbport: {port}
  qbusername: admin
  qbpassword: adminadmin
  save_path: "{downloads}"
  save_containerpath: /downloads
message:
  msg_channel: telegram
  telegram:
    telegram_token: "123:abc"
    telegram_chat_id: 42
pt:
  rmt_mode: LINK
  rmt_tmdbkey: tmdb-key
  ptsignin_cron: "0 8 * * *"
  pt_seeding_time: 86400
  pt_check_interval: 1800
  sites:
    馒头:
      rssurl: https://pt.example/rss
      signin_url: https://pt.example/attendance.php
      cookie: uid=1; pass=2
douban:
  interval: 3600
"#,
        movies = p("movies"),
        tv = p("tv"),
        trailers = p("trailers"),
        sync = p("sync"),
        downloads = p("downloads"),
        host = qb.ip(),
        port = qb.port(),
    );

    let path = root.join("config.yaml");
    fs::write(&path, yaml).unwrap();
    path
}
