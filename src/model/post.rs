//! Blog post records as served by the listing API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A post summary from `GET /posts`.
#[derive(Debug, Clone, Deserialize)]
pub struct Post {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub tags: String,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Date shown on the card row, `YYYY-MM-DD`.
    pub fn date(&self) -> String {
        self.created_at.format("%Y-%m-%d").to_string()
    }

    /// Filename of the markdown file the backend wrote for this post:
    /// `{id}-{title}.md` with `/` and spaces replaced by `-`. Must stay in
    /// lockstep with the server's scheme or detail fetches 404.
    pub fn markdown_filename(&self) -> String {
        let safe = self.title.replace(['/', ' '], "-");
        format!("{}-{}.md", self.id, safe)
    }

    /// Full location of the post's markdown under the configured base.
    pub fn markdown_location(&self, base: &str) -> String {
        format!("{}/{}", base.trim_end_matches('/'), self.markdown_filename())
    }
}

/// Payload for `POST /admin/posts`.
#[derive(Debug, Clone, Serialize, Default)]
pub struct NewPost {
    pub title: String,
    pub summary: String,
    pub cover: String,
    pub content: String,
}
