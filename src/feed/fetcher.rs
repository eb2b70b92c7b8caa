//! Feed fetcher.
//!
//! Fetches RSS/Atom documents over HTTP and parses them with `feed-rs`
//! into [`ParsedFeed`] values, enforcing timeouts and a size limit.

use std::future::Future;
use std::time::Duration;

use feed_rs::parser;
use reqwest::Client;

use crate::config::FetchConfig;
use crate::error::{PlanetoidError, Result};
use crate::feed::types::{ContentBody, ParsedFeed, ParsedItem};

/// Title used for items that carry none.
const UNTITLED_ITEM: &str = "Untitled";

/// A source of parsed feeds.
///
/// Implemented over HTTP by [`HttpFeedSource`]; tests substitute in-memory
/// sources.
pub trait FeedSource {
    /// Fetch and parse the feed at `url`.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<ParsedFeed>> + Send;
}

/// HTTP feed source with timeouts and a response size limit.
pub struct HttpFeedSource {
    client: Client,
    max_feed_size: u64,
}

impl HttpFeedSource {
    /// Create a new source from the fetch configuration.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .read_timeout(Duration::from_secs(config.read_timeout_secs))
            .timeout(Duration::from_secs(config.total_timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| PlanetoidError::Fetch(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_feed_size: config.max_feed_size_bytes,
        })
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        validate_url(url)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PlanetoidError::Fetch(format!("failed to fetch {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(PlanetoidError::Fetch(format!(
                "HTTP error for {}: {}",
                url,
                response.status()
            )));
        }

        if let Some(content_length) = response.content_length() {
            if content_length > self.max_feed_size {
                return Err(too_large(url, content_length, self.max_feed_size));
            }
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PlanetoidError::Fetch(format!("failed to read {}: {}", url, e)))?;

        // Chunked responses carry no content length
        if bytes.len() as u64 > self.max_feed_size {
            return Err(too_large(url, bytes.len() as u64, self.max_feed_size));
        }

        Ok(bytes.to_vec())
    }
}

impl FeedSource for HttpFeedSource {
    async fn fetch(&self, url: &str) -> Result<ParsedFeed> {
        let bytes = self.fetch_bytes(url).await?;
        parse_feed(&bytes)
    }
}

fn too_large(url: &str, size: u64, max: u64) -> PlanetoidError {
    PlanetoidError::Fetch(format!(
        "feed {} too large: {} bytes (max {} bytes)",
        url, size, max
    ))
}

/// Validate that a URL is fetchable over HTTP(S).
pub fn validate_url(url: &str) -> Result<()> {
    let parsed =
        url::Url::parse(url).map_err(|e| PlanetoidError::Fetch(format!("invalid URL: {}", e)))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(PlanetoidError::Fetch(format!(
                "unsupported URL scheme: {}",
                scheme
            )));
        }
    }

    if parsed.host().is_none() {
        return Err(PlanetoidError::Fetch("URL has no host".to_string()));
    }

    Ok(())
}

/// Parse feed bytes into a [`ParsedFeed`].
pub fn parse_feed(bytes: &[u8]) -> Result<ParsedFeed> {
    let feed = parser::parse(bytes)
        .map_err(|e| PlanetoidError::Fetch(format!("failed to parse feed: {}", e)))?;

    let title = feed.title.map(|t| t.content);
    let link = feed.links.first().map(|l| l.href.clone());

    let items = feed
        .entries
        .into_iter()
        .map(|entry| {
            let contents = entry
                .content
                .into_iter()
                .filter_map(|c| {
                    let mime_type = c.content_type.essence().to_string();
                    c.body.map(|value| ContentBody { mime_type, value })
                })
                .collect();

            ParsedItem {
                title: entry
                    .title
                    .map(|t| t.content)
                    .unwrap_or_else(|| UNTITLED_ITEM.to_string()),
                link: entry.links.first().map(|l| l.href.clone()),
                published_at: entry.published.or(entry.updated),
                contents,
            }
        })
        .collect();

    Ok(ParsedFeed { title, link, items })
}
