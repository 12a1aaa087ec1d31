//! Runtime configuration.
//!
//! Loaded from `~/.config/petal/config.json`. Every field has a default so
//! a missing file or a partial file both work; saving writes the resolved
//! config back in full.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Colour scheme name, `dark` or `light`.
    #[serde(default = "default_theme_name")]
    pub theme: String,

    /// Base URL of the site backend.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Base URL the post markdown documents are served from.
    #[serde(default = "default_md_base")]
    pub md_base: String,

    /// Nickname whose comments get the author badge.
    #[serde(default = "default_author_nickname")]
    pub author_nickname: String,

    /// Gallery pieces. These are static; the backend only serves posts and
    /// comments.
    #[serde(default = "default_gallery")]
    pub gallery: Vec<GalleryItem>,

    /// Cards shown on the blog page when the listing cannot be loaded, so
    /// the page still works offline.
    #[serde(default = "default_fallback_posts")]
    pub fallback_posts: Vec<FallbackPost>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackPost {
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryItem {
    pub title: String,
    pub image: String,
    #[serde(default)]
    pub caption: String,
}

fn default_theme_name() -> String {
    "dark".to_string()
}

fn default_api_base() -> String {
    "http://localhost:8080".to_string()
}

fn default_md_base() -> String {
    "http://localhost:8080/md".to_string()
}

fn default_author_nickname() -> String {
    "awkker".to_string()
}

fn default_gallery() -> Vec<GalleryItem> {
    vec![
        GalleryItem {
            title: "Xunyi".to_string(),
            image: "xunyi.png".to_string(),
            caption: "First full-body piece.".to_string(),
        },
        GalleryItem {
            title: "Mika".to_string(),
            image: "mika.png".to_string(),
            caption: "Commission study.".to_string(),
        },
    ]
}

fn default_fallback_posts() -> Vec<FallbackPost> {
    vec![FallbackPost {
        title: "about this site".to_string(),
        excerpt: "Art, commissions, and an occasional devlog. \
                  The post listing could not be reached."
            .to_string(),
    }]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme_name(),
            api_base: default_api_base(),
            md_base: default_md_base(),
            author_nickname: default_author_nickname(),
            gallery: default_gallery(),
            fallback_posts: default_fallback_posts(),
        }
    }
}

impl Config {
    /// Default location, `<config dir>/petal/config.json`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("petal")
            .join("config.json")
    }

    /// Load from `path`, falling back to defaults when the file is absent.
    /// A present but malformed file is an error, not a silent reset.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("config.json")).unwrap();
        assert_eq!(config.theme, "dark");
        assert_eq!(config.author_nickname, "awkker");
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "theme": "light" }"#).unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.theme, "light");
        assert_eq!(config.api_base, "http://localhost:8080");
        assert!(!config.gallery.is_empty());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{oops").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut config = Config::default();
        config.theme = "light".to_string();
        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap().theme, "light");
    }
}
