//! HTML content handling for entry bodies.
//!
//! Entry markup is sanitized with `ammonia` and then has its headings
//! re-leveled, so an article's outline nests under the page's own headings.

use scraper::{Html, Node};

/// Deepest heading level HTML supports.
pub const MAX_HEADING_LEVEL: u8 = 6;

/// Sanitize untrusted HTML, removing scripts and unsafe markup.
///
/// May return an empty string.
pub fn sanitize(raw: &str) -> String {
    ammonia::clean(raw)
}

/// Heading level of a tag name, `None` for non-heading tags.
fn heading_level(tag: &str) -> Option<u8> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

/// Re-base the headings of an HTML fragment to start at `base_level`.
///
/// The shallowest heading in the fragment becomes `base_level`; deeper
/// headings keep their offset from it and are capped at `h6`. A fragment
/// without headings is returned unchanged. `base_level` is clamped to 1..=6.
pub fn normalize_headings(fragment: &str, base_level: u8) -> String {
    let base_level = base_level.clamp(1, MAX_HEADING_LEVEL);
    let mut html = Html::parse_fragment(fragment);

    let min_level = html
        .tree
        .values()
        .filter_map(|node| match node {
            Node::Element(element) => heading_level(element.name()),
            _ => None,
        })
        .min();

    let Some(min_level) = min_level else {
        return fragment.to_string();
    };

    for node in html.tree.values_mut() {
        if let Node::Element(element) = node {
            if let Some(level) = heading_level(element.name()) {
                let new_level = (level - min_level + base_level).min(MAX_HEADING_LEVEL);
                element.name.local = format!("h{new_level}").as_str().into();
            }
        }
    }

    // Fragment parsing wraps everything in a synthetic <html> element
    html.root_element().inner_html()
}
