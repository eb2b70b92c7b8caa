//! Aggregation driver.
//!
//! Fetches every configured feed, builds the category tree and writes the
//! static site: `index.html` plus one page per category.

use std::path::Path;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio::time::timeout;
use tracing::{info, warn};

use crate::category::CategoryTree;
use crate::config::{FeedConfig, Settings};
use crate::error::{PlanetoidError, Result};
use crate::feed::{Feed, FeedSource};
use crate::html::{self, Element, Node};

/// Outcome of a build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of configured feeds.
    pub configured: usize,
    /// Number of feeds fetched successfully.
    pub fetched: usize,
    /// URLs of the feeds that failed, with the reason.
    pub failed: Vec<(String, String)>,
    /// Number of HTML files written, `index.html` included.
    pub pages: usize,
}

/// Drives a full build.
pub struct Aggregator<S> {
    source: S,
    settings: Settings,
}

impl<S: FeedSource> Aggregator<S> {
    /// Create a new aggregator fetching through `source`.
    pub fn new(source: S, settings: Settings) -> Self {
        Self { source, settings }
    }

    /// Fetch all feeds and write the site into `output_dir`.
    ///
    /// The output directory is removed and recreated. In fail-fast mode a
    /// failed feed aborts the run before anything is written.
    pub async fn run(&self, configs: Vec<FeedConfig>, output_dir: &Path) -> Result<RunSummary> {
        let configured = configs.len();
        info!("Fetching {} feed(s)", configured);

        let (feeds, failed) = self.fetch_all(configs).await;
        if self.settings.fetch.fail_fast {
            if let Some((url, reason)) = failed.first() {
                return Err(PlanetoidError::Fetch(format!("{}: {}", url, reason)));
            }
        }

        let tree = CategoryTree::from_feeds(&feeds);
        info!(
            "Fetched {}/{} feed(s) into {} categories",
            feeds.len(),
            configured,
            tree.len() - 1
        );

        prepare_output_dir(output_dir)?;
        let pages = self.write_site(&tree, output_dir)?;

        let summary = RunSummary {
            configured,
            fetched: feeds.len(),
            failed,
            pages,
        };
        info!(
            "Wrote {} page(s) to {} ({} feed(s) failed)",
            summary.pages,
            output_dir.display(),
            summary.failed.len()
        );
        Ok(summary)
    }

    /// Fetch every feed, at most `fetch.concurrency` at a time.
    ///
    /// Results keep configuration order.
    pub async fn fetch_all(&self, configs: Vec<FeedConfig>) -> (Vec<Feed>, Vec<(String, String)>) {
        let limit = Duration::from_secs(self.settings.fetch.total_timeout_secs);
        let concurrency = self.settings.fetch.concurrency.max(1);

        let results: Vec<_> = stream::iter(configs)
            .map(|config| async move {
                let result = match timeout(limit, self.source.fetch(&config.rss)).await {
                    Ok(result) => result,
                    Err(_) => Err(PlanetoidError::Fetch(format!(
                        "timed out after {} seconds",
                        limit.as_secs()
                    ))),
                };
                (config, result)
            })
            .buffered(concurrency)
            .collect()
            .await;

        let mut feeds = Vec::new();
        let mut failed = Vec::new();
        for (config, result) in results {
            match result {
                Ok(parsed) => {
                    info!("Loaded {} ({} items)", config.rss, parsed.items.len());
                    feeds.push(Feed::new(config, parsed));
                }
                Err(e) => {
                    warn!("Failed to fetch {}: {}", config.rss, e);
                    failed.push((config.rss, e.to_string()));
                }
            }
        }
        (feeds, failed)
    }

    /// Write `index.html` and every category page.
    fn write_site(&self, tree: &CategoryTree<'_>, output_dir: &Path) -> Result<usize> {
        let render = &self.settings.render;

        let index = html::document(
            &render.site_title,
            [
                Node::from(Element::new("h1").text(render.site_title.as_str())),
                Node::from(tree.render_index()),
            ],
        );
        std::fs::write(output_dir.join("index.html"), index)?;

        let mut pages = 1;
        for (_, child) in tree.node(tree.root()).children() {
            pages += tree.render_page(child, output_dir, render)?;
        }
        Ok(pages)
    }
}

/// Remove `dir` if it exists and create it empty.
fn prepare_output_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        std::fs::remove_dir_all(dir)?;
    }
    std::fs::create_dir_all(dir)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::ParsedFeed;

    /// Source that answers every URL with an empty feed titled after it.
    struct EchoSource;

    impl FeedSource for EchoSource {
        async fn fetch(&self, url: &str) -> Result<ParsedFeed> {
            if url.contains("broken") {
                return Err(PlanetoidError::Fetch("HTTP error: 500".to_string()));
            }
            Ok(ParsedFeed {
                title: Some(url.to_string()),
                ..ParsedFeed::default()
            })
        }
    }

    #[tokio::test]
    async fn test_fetch_all_keeps_order_and_isolates_failures() {
        let aggregator = Aggregator::new(EchoSource, Settings::default());
        let configs = vec![
            FeedConfig::new("https://one.example/feed"),
            FeedConfig::new("https://broken.example/feed"),
            FeedConfig::new("https://two.example/feed"),
        ];

        let (feeds, failed) = aggregator.fetch_all(configs).await;
        let urls: Vec<_> = feeds.iter().map(|f| f.url()).collect();
        assert_eq!(urls, vec!["https://one.example/feed", "https://two.example/feed"]);
        assert_eq!(feeds[1].display_title(), "https://two.example/feed");
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].0, "https://broken.example/feed");
        assert!(failed[0].1.contains("500"));
    }

    #[test]
    fn test_prepare_output_dir_clears_contents() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("site");
        std::fs::create_dir_all(out.join("nested")).unwrap();
        std::fs::write(out.join("stale.html"), "old").unwrap();

        prepare_output_dir(&out).unwrap();
        assert!(out.is_dir());
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 0);
    }
}
