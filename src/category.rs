//! Category tree.
//!
//! Feeds declare `/`-separated category paths (`News/Tech`). The tree holds
//! one node per path prefix, and every node lists all feeds of its subtree.
//! Nodes live in an arena and refer to each other by [`CategoryId`].

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use tracing::{debug, warn};

use crate::config::RenderConfig;
use crate::error::Result;
use crate::feed::Feed;
use crate::html::{self, link, Element, Node};
use crate::timeline::Timeline;

/// Name of the root node.
pub const ROOT_NAME: &str = "*";

/// Separator between segments of a slug.
pub const SLUG_SEPARATOR: &str = "--";

/// Page name of the site index; no category page may take it.
pub const INDEX_SLUG: &str = "index";

/// Index of a node in its [`CategoryTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CategoryId(usize);

/// One category.
#[derive(Debug, Clone)]
pub struct CategoryNode<'a> {
    name: String,
    parent: Option<CategoryId>,
    children: BTreeMap<String, CategoryId>,
    feeds: Vec<&'a Feed>,
}

impl<'a> CategoryNode<'a> {
    fn new(name: impl Into<String>, parent: Option<CategoryId>) -> Self {
        Self {
            name: name.into(),
            parent,
            children: BTreeMap::new(),
            feeds: Vec::new(),
        }
    }

    /// Category name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent node, `None` for the root.
    pub fn parent(&self) -> Option<CategoryId> {
        self.parent
    }

    /// Children, sorted by name.
    pub fn children(&self) -> impl Iterator<Item = (&str, CategoryId)> + '_ {
        self.children.iter().map(|(name, &id)| (name.as_str(), id))
    }

    /// Feeds in this category or any of its descendants, in insertion order.
    pub fn feeds(&self) -> &[&'a Feed] {
        &self.feeds
    }
}

/// Hierarchical category namespace over a set of feeds.
#[derive(Debug, Clone)]
pub struct CategoryTree<'a> {
    nodes: Vec<CategoryNode<'a>>,
}

impl Default for CategoryTree<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> CategoryTree<'a> {
    /// Create a tree holding only the root.
    pub fn new() -> Self {
        Self {
            nodes: vec![CategoryNode::new(ROOT_NAME, None)],
        }
    }

    /// Build a tree from feeds and each of their configured category paths.
    pub fn from_feeds<I>(feeds: I) -> Self
    where
        I: IntoIterator<Item = &'a Feed>,
    {
        let mut tree = Self::new();
        for feed in feeds {
            if feed.config.categories.is_empty() {
                debug!("Feed {} has no category", feed.url());
            }
            for path in &feed.config.categories {
                tree.insert(feed, path);
            }
        }
        tree
    }

    /// The root node's id.
    pub fn root(&self) -> CategoryId {
        CategoryId(0)
    }

    /// Look up a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not handed out by this tree.
    pub fn node(&self, id: CategoryId) -> &CategoryNode<'a> {
        &self.nodes[id.0]
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds only the root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// All node ids, root first.
    pub fn ids(&self) -> impl Iterator<Item = CategoryId> {
        (0..self.nodes.len()).map(CategoryId)
    }

    /// Find the node at a `/`-separated path.
    pub fn get(&self, path: &str) -> Option<CategoryId> {
        segments(path).try_fold(self.root(), |id, segment| {
            self.node(id).children.get(segment).copied()
        })
    }

    /// Add `feed` to every node along `path`, creating missing nodes.
    ///
    /// A feed is listed at most once per node; feeds are identified by URL.
    pub fn insert(&mut self, feed: &'a Feed, path: &str) {
        if segments(path).next().is_none() {
            warn!("Ignoring empty category path {:?} of {}", path, feed.url());
            return;
        }

        let mut current = self.root();
        for segment in segments(path) {
            current = match self.nodes[current.0].children.get(segment) {
                Some(&child) => child,
                None => {
                    let child = CategoryId(self.nodes.len());
                    self.nodes.push(CategoryNode::new(segment, Some(current)));
                    self.nodes[current.0]
                        .children
                        .insert(segment.to_string(), child);
                    child
                }
            };

            let feeds = &mut self.nodes[current.0].feeds;
            if !feeds.iter().any(|f| f.url() == feed.url()) {
                feeds.push(feed);
            }
        }
    }

    /// Filename-safe identifier of a node.
    ///
    /// Empty for the root, the escaped name for its children, and the
    /// parent's slug plus `--` plus the escaped name below that. A top-level
    /// category named `index` (in any case) has its first letter escaped,
    /// e.g. `~69ndex`, so its page never replaces `index.html`.
    pub fn slug(&self, id: CategoryId) -> String {
        let node = self.node(id);
        match node.parent {
            None => String::new(),
            Some(parent) if self.node(parent).parent.is_none() => {
                escape_top_segment(&node.name)
            }
            Some(parent) => format!(
                "{}{}{}",
                self.slug(parent),
                SLUG_SEPARATOR,
                escape_segment(&node.name)
            ),
        }
    }

    /// Human readable path of a node, e.g. `News / Tech`.
    pub fn label(&self, id: CategoryId) -> String {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(id) = current {
            let node = self.node(id);
            if node.parent.is_some() {
                names.push(node.name.as_str());
            }
            current = node.parent;
        }
        names.reverse();
        names.join(" / ")
    }

    /// Nested list of every category, linking to its page.
    pub fn render_index(&self) -> Element {
        Element::new("ul").child(self.render_list_item(self.root()))
    }

    fn render_list_item(&self, id: CategoryId) -> Element {
        let node = self.node(id);
        let item = if node.parent.is_none() {
            Element::new("li").text(ROOT_NAME)
        } else {
            Element::new("li").child(link(
                format!("{}.html", self.slug(id)),
                format!("{} ({})", node.name, node.feeds.len()),
            ))
        };

        if node.children.is_empty() {
            return item;
        }
        item.child(
            Element::new("ul").children(node.children().map(|(_, c)| self.render_list_item(c))),
        )
    }

    /// Write `<output_dir>/<slug>.html` for the node and, recursively, for
    /// all its descendants. Returns the number of pages written.
    pub fn render_page(
        &self,
        id: CategoryId,
        output_dir: &Path,
        options: &RenderConfig,
    ) -> Result<usize> {
        let slug = self.slug(id);
        let page = self.page_html(id, options);
        std::fs::write(output_dir.join(format!("{slug}.html")), page)?;
        debug!("Wrote {}.html", slug);

        let mut written = 1;
        for (_, child) in self.node(id).children() {
            written += self.render_page(child, output_dir, options)?;
        }
        Ok(written)
    }

    /// Complete HTML document of one category page.
    pub fn page_html(&self, id: CategoryId, options: &RenderConfig) -> String {
        let label = self.label(id);
        let timeline = Timeline::build(self.node(id).feeds());

        let mut body: Vec<Node> = Vec::new();
        body.push(
            Element::new("nav")
                .child(link("index.html", options.site_title.as_str()))
                .text(format!(" / {label}"))
                .into(),
        );

        body.push(
            Element::new("ul")
                .attr("class", "feeds")
                .children(timeline.feed_counts().into_iter().map(|(feed, count)| {
                    Element::new("li")
                        .child(link(feed.link(), feed.display_title()))
                        .text(format!(" ({count})"))
                }))
                .into(),
        );

        for group in timeline.groups() {
            body.push(
                Element::new("h1")
                    .text(group.date.format("%Y-%m-%d").to_string())
                    .into(),
            );
            body.extend(
                group
                    .entries
                    .iter()
                    .map(|entry| entry.render(options.body_heading_level)),
            );
        }

        html::document(&format!("{} - {}", options.site_title, label), body)
    }
}

/// Non-empty segments of a category path.
fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').map(str::trim).filter(|s| !s.is_empty())
}

/// Escape the name of a top-level category, keeping clear of [`INDEX_SLUG`].
fn escape_top_segment(name: &str) -> String {
    // Case-insensitive filesystems would still clash on `Index`
    if name.eq_ignore_ascii_case(INDEX_SLUG) {
        // `~` only ever comes out of escaping, so this cannot collide
        return format!("~{:02X}{}", name.as_bytes()[0], &name[1..]);
    }
    escape_segment(name)
}

/// Escape a category name for use in a slug.
///
/// Alphanumerics, `_` and `.` are kept; every other character becomes
/// `~XX` per UTF-8 byte, so `--` never occurs inside an escaped name.
fn escape_segment(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_alphanumeric() || c == '_' || c == '.' {
            out.push(c);
        } else {
            let mut buf = [0u8; 4];
            for byte in c.encode_utf8(&mut buf).bytes() {
                let _ = write!(out, "~{byte:02X}");
            }
        }
    }
    out
}
