//! Planetoid - a static feed aggregator.
//!
//! Fetches a configured set of RSS/Atom feeds and renders them into a static
//! HTML archive organized by a hierarchical category tree, with entries
//! grouped per day and their markup sanitized and re-leveled.

pub mod aggregator;
pub mod category;
pub mod config;
pub mod content;
pub mod entry;
pub mod error;
pub mod feed;
pub mod html;
pub mod logging;
pub mod opml;
pub mod timeline;

pub use aggregator::{Aggregator, RunSummary};
pub use category::{CategoryId, CategoryNode, CategoryTree};
pub use config::{load_feeds, parse_feeds, FeedConfig, Settings};
pub use content::{normalize_headings, sanitize};
pub use entry::Entry;
pub use error::{PlanetoidError, Result};
pub use feed::{Feed, FeedSource, HttpFeedSource, ParsedFeed, ParsedItem};
pub use timeline::{DayGroup, Timeline};
