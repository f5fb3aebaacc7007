//! Node-tree abstraction used by every page extractor
//!
//! Extractors never see `scraper` types. They work against [`Document`] and
//! [`Node`], which expose the handful of operations the heuristics need:
//! first-by-tag, first-by-exact-text, all-by-attribute-substring,
//! next-sibling-matching, forward traversal, attribute reads, and stripped
//! text. Tests build synthetic trees by parsing small HTML snippets.

mod node;

pub use node::{Following, Node};

use scraper::Html;

/// A parsed HTML page
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses a raw response body; invalid UTF-8 is replaced, never rejected
    pub fn parse(bytes: &[u8]) -> Self {
        Self::parse_str(&String::from_utf8_lossy(bytes))
    }

    pub fn parse_str(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// The document node itself
    pub fn root(&self) -> Node<'_> {
        Node::new(self.html.tree.root())
    }

    /// First element with the given tag
    pub fn find_tag(&self, tag: &str) -> Option<Node<'_>> {
        self.root().find(tag, "")
    }

    /// First element with `tag` carrying all `classes`
    pub fn find(&self, tag: &str, classes: &str) -> Option<Node<'_>> {
        self.root().find(tag, classes)
    }

    /// Every element with `tag` carrying all `classes`
    pub fn find_all(&self, tag: &str, classes: &str) -> Vec<Node<'_>> {
        self.root().find_all(tag, classes)
    }

    /// First text node whose trimmed content equals `text`
    pub fn find_text(&self, text: &str) -> Option<Node<'_>> {
        self.html
            .tree
            .root()
            .descendants()
            .find(|n| {
                n.value().as_text().is_some_and(|t| t.trim() == text)
                    && !node::in_non_text_element(*n)
            })
            .map(Node::new)
    }

    /// Every `tag` element whose `attr` value contains `needle`
    pub fn find_all_by_attr_containing(&self, tag: &str, attr: &str, needle: &str) -> Vec<Node<'_>> {
        self.root()
            .descendants()
            .filter(|n| n.is_tag(tag) && n.attr(attr).is_some_and(|v| v.contains(needle)))
            .collect()
    }

    /// Every anchor that carries an href, paired with that href
    pub fn links(&self) -> Vec<(Node<'_>, &str)> {
        self.root()
            .descendants()
            .filter(|n| n.is_tag("a"))
            .filter_map(|n| n.attr("href").map(|href| (n, href)))
            .collect()
    }

    /// Every trimmed, non-empty text fragment in the document
    pub fn stripped_strings(&self) -> impl Iterator<Item = &str> + '_ {
        self.root().text_fragments()
    }
}
