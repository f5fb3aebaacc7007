use ego_tree::NodeRef;
use scraper::node::Node as RawNode;

/// Elements whose text content never renders as page text
const NON_TEXT_TAGS: [&str; 3] = ["script", "style", "template"];

/// True when `node` sits inside a `script`, `style` or `template` element
pub(crate) fn in_non_text_element(node: NodeRef<'_, RawNode>) -> bool {
    node.ancestors().any(|a| {
        a.value()
            .as_element()
            .is_some_and(|e| NON_TEXT_TAGS.contains(&e.name()))
    })
}

/// A handle to one node (element or text) in a parsed [`Document`]
///
/// Navigation follows document order: [`Node::following`] walks every node
/// that starts after this one, descending into children before moving on to
/// siblings and then to the siblings of ancestors.
///
/// [`Document`]: super::Document
#[derive(Clone, Copy)]
pub struct Node<'a> {
    inner: NodeRef<'a, RawNode>,
}

impl<'a> Node<'a> {
    pub(crate) fn new(inner: NodeRef<'a, RawNode>) -> Self {
        Self { inner }
    }

    /// Tag name for elements, `None` for text and other node kinds
    pub fn tag(&self) -> Option<&'a str> {
        self.inner.value().as_element().map(|e| e.name())
    }

    pub fn is_element(&self) -> bool {
        self.inner.value().is_element()
    }

    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag().is_some_and(|name| name.eq_ignore_ascii_case(tag))
    }

    /// Raw attribute value
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.inner.value().as_element().and_then(|e| e.attr(name))
    }

    /// True when every whitespace-separated class in `classes` is present
    ///
    /// An empty `classes` string matches any element.
    pub fn has_classes(&self, classes: &str) -> bool {
        let Some(element) = self.inner.value().as_element() else {
            return false;
        };
        classes
            .split_whitespace()
            .all(|wanted| element.classes().any(|c| c == wanted))
    }

    /// True for an element with the given tag carrying all `classes`
    pub fn matches(&self, tag: &str, classes: &str) -> bool {
        self.is_tag(tag) && self.has_classes(classes)
    }

    /// Stripped text: every text fragment under this node, trimmed, empty
    /// fragments dropped, concatenated without a separator
    pub fn text(&self) -> String {
        self.text_fragments().collect()
    }

    /// Trimmed, non-empty text fragments under this node, in document order
    ///
    /// Script, style and template contents are skipped.
    pub fn text_fragments(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.inner
            .descendants()
            .filter(|n| n.value().is_text() && !in_non_text_element(*n))
            .filter_map(|n| n.value().as_text())
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
    }

    /// Element descendants, excluding this node
    pub fn descendants(&self) -> impl Iterator<Item = Node<'a>> + 'a {
        self.inner
            .descendants()
            .skip(1)
            .map(Node::new)
            .filter(Node::is_element)
    }

    /// First descendant element with `tag` carrying all `classes`
    pub fn find(&self, tag: &str, classes: &str) -> Option<Node<'a>> {
        self.descendants().find(|n| n.matches(tag, classes))
    }

    /// Every descendant element with `tag` carrying all `classes`
    pub fn find_all(&self, tag: &str, classes: &str) -> Vec<Node<'a>> {
        self.descendants().filter(|n| n.matches(tag, classes)).collect()
    }

    /// Element siblings after this node
    pub fn next_siblings(&self) -> impl Iterator<Item = Node<'a>> + 'a {
        self.inner
            .next_siblings()
            .map(Node::new)
            .filter(Node::is_element)
    }

    /// First later sibling with `tag` carrying all `classes`
    pub fn next_sibling_matching(&self, tag: &str, classes: &str) -> Option<Node<'a>> {
        self.next_siblings().find(|n| n.matches(tag, classes))
    }

    /// Every element that starts after this node in document order
    pub fn following(&self) -> Following<'a> {
        Following {
            next: next_in_document(self.inner),
        }
    }

    /// The first element after this node in document order
    pub fn next_element(&self) -> Option<Node<'a>> {
        self.following().next()
    }

    /// The first element with `tag` after this node in document order
    pub fn find_next(&self, tag: &str) -> Option<Node<'a>> {
        self.following().find(|n| n.is_tag(tag))
    }

    /// Walks forward from this node and returns every element before the first
    /// one `stop` accepts
    pub fn following_until<F>(&self, stop: F) -> impl Iterator<Item = Node<'a>> + 'a
    where
        F: Fn(&Node<'a>) -> bool + 'a,
    {
        self.following().take_while(move |n| !stop(n))
    }
}

impl std::fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.tag() {
            Some(tag) => write!(f, "<{}>", tag),
            None => write!(f, "{:?}", self.text()),
        }
    }
}

/// Forward document-order traversal, elements only
pub struct Following<'a> {
    next: Option<NodeRef<'a, RawNode>>,
}

impl<'a> Iterator for Following<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.next {
            self.next = next_in_document(current);
            if current.value().is_element() {
                return Some(Node::new(current));
            }
        }
        None
    }
}

/// Pre-order successor: first child, else the nearest following sibling of
/// this node or one of its ancestors
fn next_in_document(node: NodeRef<'_, RawNode>) -> Option<NodeRef<'_, RawNode>> {
    if let Some(child) = node.first_child() {
        return Some(child);
    }

    let mut current = node;
    loop {
        if let Some(sibling) = current.next_sibling() {
            return Some(sibling);
        }
        current = current.parent()?;
    }
}
