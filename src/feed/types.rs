//! Feed types for Planetoid.

use chrono::{DateTime, Utc};

use crate::config::FeedConfig;

/// Title shown for feeds that carry none and have none configured.
pub const UNTITLED_FEED: &str = "Untitled feed";

/// Parsed feed data from external source.
#[derive(Debug, Clone, Default)]
pub struct ParsedFeed {
    /// Feed title.
    pub title: Option<String>,
    /// Site URL (the website the feed belongs to).
    pub link: Option<String>,
    /// Parsed items, in document order.
    pub items: Vec<ParsedItem>,
}

/// Parsed item data from external source.
#[derive(Debug, Clone, Default)]
pub struct ParsedItem {
    /// Item title.
    pub title: String,
    /// Link to the original article.
    pub link: Option<String>,
    /// Publication timestamp (falls back to the update timestamp).
    pub published_at: Option<DateTime<Utc>>,
    /// Every content representation the item carries.
    pub contents: Vec<ContentBody>,
}

impl ParsedItem {
    /// Create a new item.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the link.
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Set the published date.
    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }

    /// Add a content representation.
    pub fn with_content(mut self, mime_type: impl Into<String>, value: impl Into<String>) -> Self {
        self.contents.push(ContentBody {
            mime_type: mime_type.into(),
            value: value.into(),
        });
        self
    }
}

/// One representation of an item's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBody {
    /// MIME type, e.g. `text/html`.
    pub mime_type: String,
    /// Raw content.
    pub value: String,
}

impl ContentBody {
    /// Whether this representation holds HTML or XHTML markup.
    pub fn is_html(&self) -> bool {
        matches!(
            self.mime_type.as_str(),
            "text/html" | "application/xhtml+xml"
        )
    }
}

/// A successfully fetched feed.
///
/// Identity is the source URL. Read-only once constructed.
#[derive(Debug, Clone)]
pub struct Feed {
    /// Configuration record the feed was fetched from.
    pub config: FeedConfig,
    /// Fetched content.
    pub parsed: ParsedFeed,
}

impl Feed {
    /// Create a feed from its configuration and fetched content.
    pub fn new(config: FeedConfig, parsed: ParsedFeed) -> Self {
        Self { config, parsed }
    }

    /// Source URL.
    pub fn url(&self) -> &str {
        &self.config.rss
    }

    /// Title as shown in pages: the feed's own, then the configured one.
    pub fn display_title(&self) -> &str {
        self.parsed
            .title
            .as_deref()
            .into_iter()
            .chain(self.config.title.as_deref())
            .find(|t| !t.trim().is_empty())
            .unwrap_or(UNTITLED_FEED)
    }

    /// Site link, falling back to the feed URL.
    pub fn link(&self) -> &str {
        self.parsed.link.as_deref().unwrap_or(self.url())
    }
}
