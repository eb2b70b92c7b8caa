//! Timeline builder.
//!
//! Pools the entries of several feeds, newest first, grouped by calendar day.

use chrono::NaiveDate;
use tracing::warn;

use crate::entry::Entry;
use crate::error::{PlanetoidError, Result};
use crate::feed::Feed;

/// Entries published on one calendar day.
#[derive(Debug, Clone)]
pub struct DayGroup<'a> {
    /// The day.
    pub date: NaiveDate,
    /// Entries of that day, newest first.
    pub entries: Vec<Entry<'a>>,
}

/// Date-grouped, reverse-chronological entries of a set of feeds.
#[derive(Debug, Clone, Default)]
pub struct Timeline<'a> {
    groups: Vec<DayGroup<'a>>,
}

impl<'a> Timeline<'a> {
    /// Build the timeline of `feeds`.
    ///
    /// A feed with any item lacking a timestamp is left out entirely and
    /// logged; the other feeds are unaffected.
    pub fn build(feeds: &[&'a Feed]) -> Self {
        let mut entries = Vec::new();
        for &feed in feeds {
            match feed_entries(feed) {
                Ok(feed_entries) => entries.extend(feed_entries),
                Err(e) => warn!("Skipping feed {} in timeline: {}", feed.url(), e),
            }
        }

        // Stable sort: equal timestamps keep feed order
        entries.sort_by(|a, b| b.published().cmp(&a.published()));

        let mut groups: Vec<DayGroup<'a>> = Vec::new();
        for entry in entries {
            let date = entry.published().date_naive();
            match groups.last_mut() {
                Some(group) if group.date == date => group.entries.push(entry),
                _ => groups.push(DayGroup {
                    date,
                    entries: vec![entry],
                }),
            }
        }

        Self { groups }
    }

    /// Day groups, newest first.
    pub fn groups(&self) -> &[DayGroup<'a>] {
        &self.groups
    }

    /// Whether the timeline holds no entries.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterate over all entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &Entry<'a>> {
        self.groups.iter().flat_map(|g| g.entries.iter())
    }

    /// Each distinct feed in the timeline with its entry count, in order of
    /// first appearance.
    pub fn feed_counts(&self) -> Vec<(&'a Feed, usize)> {
        let mut counts: Vec<(&'a Feed, usize)> = Vec::new();
        for entry in self.entries() {
            let feed = entry.feed();
            match counts.iter_mut().find(|(f, _)| f.url() == feed.url()) {
                Some((_, count)) => *count += 1,
                None => counts.push((feed, 1)),
            }
        }
        counts
    }
}

/// Entries of one feed, or an error if any item lacks a timestamp.
fn feed_entries(feed: &Feed) -> Result<Vec<Entry<'_>>> {
    feed.parsed
        .items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let published = item.published_at.ok_or_else(|| {
                PlanetoidError::Timestamp(format!(
                    "item {} ({:?}) has no publication date",
                    index, item.title
                ))
            })?;
            Ok(Entry::new(item, published, feed))
        })
        .collect()
}
