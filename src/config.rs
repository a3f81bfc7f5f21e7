//! Configuration file parser for ~/.config/headlines/config.toml.
//!
//! The config file is optional: a missing file yields `Config::default()`.
//! Unknown keys are accepted by serde and logged as a warning.
use crate::news::{DisplayBox, GENERAL};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Where headlines are published unless `news_url` overrides it.
pub const DEFAULT_NEWS_URL: &str =
    "https://saurav.tech/NewsAPI/top-headlines/category/{category}/us.json";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Headline source: a URL template containing `{category}`, or a base
    /// URL read as `<base>/{category}.json`.
    #[serde(alias = "news_base_url")]
    pub news_url: String,

    /// Per-request timeout in seconds. 0 = no timeout.
    pub request_timeout_secs: u64,

    /// Refresh interval in minutes. 0 = manual refresh only.
    pub refresh_interval_minutes: u64,

    /// Selection used until the user saves one.
    pub default_categories: Vec<String>,

    /// Thumbnail box width in pixels.
    pub image_max_width: u32,

    /// Thumbnail box height in pixels.
    pub image_max_height: u32,

    /// Default image on disk. Unset uses the image built into the binary.
    pub default_image: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let display_box = DisplayBox::default();
        Self {
            news_url: DEFAULT_NEWS_URL.to_string(),
            request_timeout_secs: 0,
            refresh_interval_minutes: 0,
            default_categories: vec![GENERAL.to_string()],
            image_max_width: display_box.max_width,
            image_max_height: display_box.max_height,
            default_image: None,
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 8] = [
        "news_url",
        "news_base_url",
        "request_timeout_secs",
        "refresh_interval_minutes",
        "default_categories",
        "image_max_width",
        "image_max_height",
        "default_image",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            news_url = %config.news_url,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// `None` when `request_timeout_secs` is 0.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    /// Thumbnail box, with zero dimensions raised to 1.
    pub fn display_box(&self) -> DisplayBox {
        DisplayBox {
            max_width: self.image_max_width.max(1),
            max_height: self.image_max_height.max(1),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
