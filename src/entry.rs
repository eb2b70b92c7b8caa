//! Entry model: one feed item together with the feed it came from.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::content::{normalize_headings, sanitize};
use crate::feed::{Feed, ParsedItem};
use crate::html::{link, Element, Node};

/// One item of a fetched feed.
///
/// Only built by the timeline for feeds whose items all carry a timestamp.
#[derive(Debug, Clone, Copy)]
pub struct Entry<'a> {
    item: &'a ParsedItem,
    published: DateTime<Utc>,
    feed: &'a Feed,
}

impl<'a> Entry<'a> {
    /// Create an entry. `published` is the item's already-validated timestamp.
    pub(crate) fn new(item: &'a ParsedItem, published: DateTime<Utc>, feed: &'a Feed) -> Self {
        Self {
            item,
            published,
            feed,
        }
    }

    /// Item title.
    pub fn title(&self) -> &'a str {
        &self.item.title
    }

    /// Link to the original article, falling back to the feed link.
    pub fn link(&self) -> &'a str {
        self.item.link.as_deref().unwrap_or_else(|| self.feed.link())
    }

    /// Publication timestamp.
    pub fn published(&self) -> DateTime<Utc> {
        self.published
    }

    /// Feed the entry belongs to.
    pub fn feed(&self) -> &'a Feed {
        self.feed
    }

    /// Sanitized body with headings starting at `base_level`.
    ///
    /// Returns `None` when the item has no HTML content, more than one HTML
    /// representation, or nothing left after sanitizing.
    pub fn html_body(&self, base_level: u8) -> Option<String> {
        let mut html = self.item.contents.iter().filter(|c| c.is_html());
        let content = match (html.next(), html.next()) {
            (Some(content), None) => content,
            (None, _) => return None,
            (Some(_), Some(_)) => {
                debug!(
                    "Dropping ambiguous content of {:?} from {}",
                    self.item.title,
                    self.feed.url()
                );
                return None;
            }
        };

        let clean = sanitize(&content.value);
        if clean.trim().is_empty() {
            return None;
        }
        Some(normalize_headings(&clean, base_level))
    }

    /// Render the entry as a collapsible block.
    ///
    /// The header (title link and feed title) is the summary; the body is
    /// only shown once expanded.
    pub fn render(&self, base_level: u8) -> Node {
        let header = Element::new("summary").attr("class", "entry_header").child(
            Element::new("h2")
                .child(link(self.link(), self.title()))
                .text(format!(" ({})", self.feed.display_title())),
        );

        let mut details = Element::new("details").attr("class", "entry").child(header);
        if let Some(body) = self.html_body(base_level) {
            details = details.child(Element::new("div").attr("class", "entry_body").raw(body));
        }
        details.into()
    }
}
