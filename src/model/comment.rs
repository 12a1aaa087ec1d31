//! Comment board records and the coarse user-agent readout shown per row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum accepted comment length, enforced before submission.
pub const MAX_COMMENT_LEN: usize = 1000;

/// A comment as served by `GET /comments`.
#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub content: String,
    pub nickname: String,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub user_agent: String,
    #[serde(default)]
    pub location: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Timestamp shown in the meta row, `YYYY-MM-DD HH:MM`.
    pub fn timestamp(&self) -> String {
        self.created_at.format("%Y-%m-%d %H:%M").to_string()
    }

    /// Whether this comment gets the author badge.
    pub fn is_author(&self, author_nickname: &str) -> bool {
        self.nickname == author_nickname
    }
}

/// Payload for `POST /comments`. An empty nickname gets a default on the
/// server side.
#[derive(Debug, Clone, Serialize, Default)]
pub struct NewComment {
    pub nickname: String,
    pub content: String,
}

/// Major version digits following `key` in a lowercased user-agent string.
fn version_after(ua: &str, key: &str) -> Option<String> {
    let rest = &ua[ua.find(key)? + key.len()..];
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        None
    } else {
        Some(digits)
    }
}

/// Coarse browser name plus major version, e.g. `Chrome 120`.
///
/// Order matters: Edge ships a Chrome token and Chrome ships a Safari token.
pub fn browser_readout(user_agent: &str) -> String {
    let ua = user_agent.to_lowercase();
    if ua.contains("edg/") || ua.contains("edge/") {
        let v = version_after(&ua, "edg/").or_else(|| version_after(&ua, "edge/"));
        return match v {
            Some(v) => format!("Edge {v}"),
            None => "Edge".to_string(),
        };
    }
    if ua.contains("chrome/") {
        return match version_after(&ua, "chrome/") {
            Some(v) => format!("Chrome {v}"),
            None => "Chrome".to_string(),
        };
    }
    if ua.contains("firefox/") {
        return match version_after(&ua, "firefox/") {
            Some(v) => format!("Firefox {v}"),
            None => "Firefox".to_string(),
        };
    }
    if ua.contains("safari/") {
        return match version_after(&ua, "version/") {
            Some(v) => format!("Safari {v}"),
            None => "Safari".to_string(),
        };
    }
    "browser".to_string()
}

/// Coarse operating system readout from a user-agent string.
pub fn os_readout(user_agent: &str) -> String {
    let ua = user_agent.to_lowercase();
    if ua.contains("windows nt 10") || ua.contains("windows nt 11") {
        return "Windows 10/11".to_string();
    }
    if ua.contains("windows") {
        return "Windows".to_string();
    }
    if ua.contains("mac os x") || ua.contains("macintosh") {
        return "macOS".to_string();
    }
    if ua.contains("android") {
        return "Android".to_string();
    }
    if ua.contains("iphone") || ua.contains("ipad") {
        return "iOS".to_string();
    }
    if ua.contains("linux") {
        return "Linux".to_string();
    }
    "unknown system".to_string()
}
