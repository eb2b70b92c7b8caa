//! Test helpers for site build tests.
//!
//! Provides an in-memory feed source and small builders for feeds and items.

#![allow(dead_code)]

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};

use planetoid::config::Settings;
use planetoid::{FeedSource, ParsedFeed, ParsedItem, PlanetoidError, Result};

/// Feed source answering from a fixed map of URL to feed.
///
/// URLs missing from the map fail; URLs listed as slow never answer in time.
#[derive(Default)]
pub struct StaticSource {
    feeds: HashMap<String, ParsedFeed>,
    slow: Vec<String>,
}

impl StaticSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `feed` at `url`.
    pub fn with_feed(mut self, url: &str, feed: ParsedFeed) -> Self {
        self.feeds.insert(url.to_string(), feed);
        self
    }

    /// Make `url` hang far longer than any test timeout.
    pub fn with_slow(mut self, url: &str) -> Self {
        self.slow.push(url.to_string());
        self
    }
}

impl FeedSource for StaticSource {
    async fn fetch(&self, url: &str) -> Result<ParsedFeed> {
        if self.slow.iter().any(|u| u == url) {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
        self.feeds
            .get(url)
            .cloned()
            .ok_or_else(|| PlanetoidError::Fetch(format!("HTTP error for {url}: 404 Not Found")))
    }
}

/// A timestamp on the given day at the given hour (UTC).
pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

/// A feed with a title, a site link and the given items.
pub fn parsed_feed(title: &str, items: Vec<ParsedItem>) -> ParsedFeed {
    ParsedFeed {
        title: Some(title.to_string()),
        link: Some(format!("https://{}.example/", title.to_lowercase())),
        items,
    }
}

/// A dated item with an HTML body.
pub fn item(title: &str, published: DateTime<Utc>, body: &str) -> ParsedItem {
    ParsedItem::new(title)
        .with_link(format!("https://example.com/{}", title.to_lowercase()))
        .with_published_at(published)
        .with_content("text/html", body)
}

/// Settings suitable for tests: short timeout, small pool.
pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.fetch.total_timeout_secs = 1;
    settings.fetch.concurrency = 2;
    settings.render.site_title = "Test Planet".to_string();
    settings
}
