//! Configuration module for Planetoid.
//!
//! Two inputs drive a build: the feed list (YAML, one record per feed) and
//! optional run settings (TOML).

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{PlanetoidError, Result};

/// One configured feed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FeedConfig {
    /// Feed URL.
    pub rss: String,
    /// Display title, used when the feed itself carries none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Category paths, `/` separated (e.g. `News/Tech`).
    #[serde(default)]
    pub categories: Vec<String>,
}

impl FeedConfig {
    /// Create a new feed record.
    pub fn new(rss: impl Into<String>) -> Self {
        Self {
            rss: rss.into(),
            title: None,
            categories: Vec::new(),
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Add a category path.
    pub fn with_category(mut self, path: impl Into<String>) -> Self {
        self.categories.push(path.into());
        self
    }
}

/// Load the feed list from a YAML file.
pub fn load_feeds<P: AsRef<Path>>(path: P) -> Result<Vec<FeedConfig>> {
    let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        PlanetoidError::Config(format!(
            "cannot read feed list {}: {e}",
            path.as_ref().display()
        ))
    })?;
    parse_feeds(&content)
}

/// Parse and validate a feed list from a YAML string.
pub fn parse_feeds(s: &str) -> Result<Vec<FeedConfig>> {
    let feeds: Vec<FeedConfig> = serde_yaml::from_str(s)
        .map_err(|e| PlanetoidError::Config(format!("feed list parse error: {e}")))?;

    for feed in &feeds {
        let parsed = url::Url::parse(&feed.rss).map_err(|e| {
            PlanetoidError::Config(format!("invalid feed URL {:?}: {e}", feed.rss))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(PlanetoidError::Config(format!(
                "unsupported URL scheme in {:?}",
                feed.rss
            )));
        }
    }

    Ok(feeds)
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional log file; console only when unset.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Feed fetching configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Maximum number of feeds fetched at the same time.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Read timeout in seconds.
    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,
    /// Total timeout per feed in seconds.
    #[serde(default = "default_total_timeout")]
    pub total_timeout_secs: u64,
    /// Maximum number of redirects.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    /// Maximum feed size in bytes.
    #[serde(default = "default_max_feed_size")]
    pub max_feed_size_bytes: u64,
    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Abort the whole run on the first failed feed instead of skipping it.
    #[serde(default)]
    pub fail_fast: bool,
}

fn default_concurrency() -> usize {
    8
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_read_timeout() -> u64 {
    20
}

fn default_total_timeout() -> u64 {
    30
}

fn default_max_redirects() -> usize {
    5
}

fn default_max_feed_size() -> u64 {
    5 * 1024 * 1024 // 5MB
}

fn default_user_agent() -> String {
    format!("planetoid/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            connect_timeout_secs: default_connect_timeout(),
            read_timeout_secs: default_read_timeout(),
            total_timeout_secs: default_total_timeout(),
            max_redirects: default_max_redirects(),
            max_feed_size_bytes: default_max_feed_size(),
            user_agent: default_user_agent(),
            fail_fast: false,
        }
    }
}

/// Page rendering configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// Title shown in the index page and every page's `<title>`.
    #[serde(default = "default_site_title")]
    pub site_title: String,
    /// Heading level at which entry bodies start (1-6).
    #[serde(default = "default_body_heading_level")]
    pub body_heading_level: u8,
}

fn default_site_title() -> String {
    "Planetoid".to_string()
}

fn default_body_heading_level() -> u8 {
    3 // below the date h1 and the entry h2
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            site_title: default_site_title(),
            body_heading_level: default_body_heading_level(),
        }
    }
}

/// Run settings.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Fetch configuration.
    #[serde(default)]
    pub fetch: FetchConfig,
    /// Render configuration.
    #[serde(default)]
    pub render: RenderConfig,
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            PlanetoidError::Config(format!(
                "cannot read settings {}: {e}",
                path.as_ref().display()
            ))
        })?;
        Self::parse(&content)
    }

    /// Parse settings from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        let settings: Self = toml::from_str(s)
            .map_err(|e| PlanetoidError::Config(format!("settings parse error: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate the settings.
    ///
    /// Returns an error if:
    /// - `fetch.concurrency` is zero
    /// - `render.body_heading_level` is outside 1..=6
    pub fn validate(&self) -> Result<()> {
        if self.fetch.concurrency == 0 {
            return Err(PlanetoidError::Config(
                "fetch.concurrency must be at least 1".to_string(),
            ));
        }
        if !(1..=6).contains(&self.render.body_heading_level) {
            return Err(PlanetoidError::Config(format!(
                "render.body_heading_level must be between 1 and 6, got {}",
                self.render.body_heading_level
            )));
        }
        Ok(())
    }
}
