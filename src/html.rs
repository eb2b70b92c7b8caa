//! Minimal HTML tree and emitter for generated pages.
//!
//! Text and attribute values are escaped on output; [`Node::Raw`] carries
//! already-sanitized markup through untouched.

use html_escape::{encode_double_quoted_attribute, encode_text};

/// Inline stylesheet shared by every page.
const STYLE: &str = r#"
:root {
  color-scheme: light dark;
}
body {
  max-width: 40em;
  margin-left: auto;
  margin-right: auto;
  padding-left: 2em;
  padding-right: 2em;
}
p, blockquote {
  line-height: 1.6em;
  font-size: 20px;
}
img {
  max-width: 100%;
  height: auto;
}
summary.entry_header {
  cursor: pointer;
  padding-top: 0.5em;
  padding-bottom: 0.5em;
  border-top: 0.2em solid currentColor;
}
summary.entry_header h2 {
  display: inline;
}
"#;

/// A node of an HTML tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// An element with attributes and children.
    Element(Element),
    /// Text, escaped on output.
    Text(String),
    /// Markup emitted verbatim.
    Raw(String),
}

impl Node {
    /// Render the node into `out`.
    pub fn render_into(&self, out: &mut String) {
        match self {
            Node::Element(element) => element.render_into(out),
            Node::Text(text) => out.push_str(&encode_text(text)),
            Node::Raw(markup) => out.push_str(markup),
        }
    }

    /// Render the node to a new string.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// An HTML element.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: &'static str,
    attrs: Vec<(&'static str, String)>,
    children: Vec<Node>,
}

impl Element {
    /// Create an empty element.
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute.
    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    /// Append a child node.
    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    /// Append several child nodes.
    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    /// Append a text child.
    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    /// Append raw markup.
    pub fn raw(self, markup: impl Into<String>) -> Self {
        self.child(Node::Raw(markup.into()))
    }

    /// Render the element into `out`.
    pub fn render_into(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&encode_double_quoted_attribute(value));
            out.push('"');
        }
        out.push('>');
        for child in &self.children {
            child.render_into(out);
        }
        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
    }

    /// Render the element to a new string.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }
}

/// Shorthand for a link element.
pub fn link(href: impl Into<String>, text: impl Into<String>) -> Element {
    Element::new("a").attr("href", href).text(text)
}

/// Render a complete, self-contained HTML document.
pub fn document<I>(title: &str, body: I) -> String
where
    I: IntoIterator<Item = Node>,
{
    let head = Element::new("head")
        .child(Node::Raw("<meta charset=\"utf-8\">".to_string()))
        .child(Node::Raw(
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">"
                .to_string(),
        ))
        .child(Element::new("title").text(title))
        .child(Element::new("style").raw(STYLE));

    let html = Element::new("html")
        .attr("lang", "en")
        .child(head)
        .child(Element::new("body").children(body));

    let mut out = String::from("<!DOCTYPE html>\n");
    html.render_into(&mut out);
    out.push('\n');
    out
}
