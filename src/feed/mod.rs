//! Feed module for Planetoid.
//!
//! Feed types and the fetch collaborator that produces them.

pub mod fetcher;
pub mod types;

pub use fetcher::{parse_feed, validate_url, FeedSource, HttpFeedSource};
pub use types::{ContentBody, Feed, ParsedFeed, ParsedItem, UNTITLED_FEED};
