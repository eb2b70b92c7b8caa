//! OPML import.
//!
//! Converts an OPML subscription list into the YAML feed list. Outlines
//! without `xmlUrl` are categories; nesting them yields nested category
//! paths (`News/Tech`). Outlines with `xmlUrl` become feeds filed under the
//! enclosing category path.

use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::config::FeedConfig;
use crate::error::{PlanetoidError, Result};

/// Read an OPML file into feed records.
pub fn load_opml<P: AsRef<Path>>(path: P) -> Result<Vec<FeedConfig>> {
    let content = std::fs::read_to_string(path.as_ref())?;
    parse_opml(&content)
}

/// Parse an OPML document into feed records, in document order.
pub fn parse_opml(xml: &str) -> Result<Vec<FeedConfig>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut feeds = Vec::new();
    // One slot per open <outline>; Some(name) for categories
    let mut open: Vec<Option<String>> = Vec::new();

    loop {
        let event = reader.read_event().map_err(|e| {
            PlanetoidError::Opml(format!(
                "parse error at position {}: {}",
                reader.buffer_position(),
                e
            ))
        })?;

        match event {
            Event::Start(e) if e.name().as_ref() == b"outline" => {
                let outline = Outline::read(&e)?;
                match outline.xml_url {
                    Some(url) => {
                        feeds.push(outline_feed(url, outline.title, &open));
                        open.push(None);
                    }
                    None => open.push(outline.text),
                }
            }
            Event::Empty(e) if e.name().as_ref() == b"outline" => {
                let outline = Outline::read(&e)?;
                if let Some(url) = outline.xml_url {
                    feeds.push(outline_feed(url, outline.title, &open));
                }
            }
            Event::End(e) if e.name().as_ref() == b"outline" => {
                open.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(feeds)
}

/// Serialize feed records as the YAML feed list.
pub fn to_yaml(feeds: &[FeedConfig]) -> Result<String> {
    serde_yaml::to_string(feeds).map_err(|e| PlanetoidError::Opml(format!("YAML error: {e}")))
}

/// Attributes of one `<outline>` element.
struct Outline {
    xml_url: Option<String>,
    title: Option<String>,
    text: Option<String>,
}

impl Outline {
    fn read(e: &BytesStart<'_>) -> Result<Self> {
        let xml_url = attribute(e, "xmlUrl")?;
        let text = attribute(e, "text")?;
        let title = attribute(e, "title")?.or_else(|| text.clone());
        Ok(Self {
            xml_url,
            title,
            text,
        })
    }
}

fn attribute(e: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
    let attr = e
        .try_get_attribute(name)
        .map_err(|err| PlanetoidError::Opml(format!("bad attribute {name}: {err}")))?;
    match attr {
        Some(attr) => {
            let value = attr
                .unescape_value()
                .map_err(|err| PlanetoidError::Opml(format!("bad attribute {name}: {err}")))?;
            let value = value.trim();
            Ok((!value.is_empty()).then(|| value.to_string()))
        }
        None => Ok(None),
    }
}

fn outline_feed(url: String, title: Option<String>, open: &[Option<String>]) -> FeedConfig {
    let path: Vec<&str> = open.iter().flatten().map(String::as_str).collect();
    FeedConfig {
        rss: url,
        title,
        categories: if path.is_empty() {
            Vec::new()
        } else {
            vec![path.join("/")]
        },
    }
}
