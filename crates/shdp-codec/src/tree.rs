//! The document tree carried by `HTML_FILE_RESPONSE` payloads.
//!
//! A document is an ordered forest of elements with no implicit wrapping
//! root. The tree is a pure value type: the encoder consumes it, the
//! decoder produces it, and parent/child is strict ownership with no
//! back-pointers.

/// A child of an element: either raw text or a nested element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// A raw UTF-8 text chunk.
    Text(String),
    /// A nested element.
    Element(Node),
}

/// A markup element: tag name, ordered attributes, ordered children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Node {
    /// The element's tag name.
    pub tag_name: String,
    /// Attribute pairs in declaration order; names are unique.
    pub attributes: Vec<(String, String)>,
    /// Children in document order.
    pub children: Vec<Content>,
}

impl Node {
    /// Create an element with no attributes or children.
    #[must_use]
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute, replacing any existing value for the same name.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(pair) = self.attributes.iter_mut().find(|(n, _)| *n == name) {
            pair.1 = value;
        } else {
            self.attributes.push((name, value));
        }
    }

    /// Builder-style [`Node::set_attribute`].
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Look up an attribute value by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Append a text chunk child.
    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(Content::Text(text.into()));
    }

    /// Append an element child.
    pub fn push_child(&mut self, child: Node) {
        self.children.push(Content::Element(child));
    }

    /// Builder-style [`Node::push_text`].
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.push_text(text);
        self
    }

    /// Builder-style [`Node::push_child`].
    #[must_use]
    pub fn with_child(mut self, child: Node) -> Self {
        self.push_child(child);
        self
    }
}

/// An ordered forest of top-level elements.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    roots: Vec<Node>,
}

impl Document {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The top-level elements in order.
    #[must_use]
    pub fn roots(&self) -> &[Node] {
        &self.roots
    }

    /// Append a top-level element.
    pub fn push(&mut self, node: Node) {
        self.roots.push(node);
    }

    /// Builder-style [`Document::push`].
    #[must_use]
    pub fn with(mut self, node: Node) -> Self {
        self.push(node);
        self
    }

    /// Whether the document has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

impl From<Vec<Node>> for Document {
    fn from(roots: Vec<Node>) -> Self {
        Self { roots }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_attribute_replaces_existing() {
        let mut node = Node::new("p");
        node.set_attribute("class", "a");
        node.set_attribute("id", "x");
        node.set_attribute("class", "b");

        assert_eq!(
            node.attributes,
            vec![
                ("class".to_string(), "b".to_string()),
                ("id".to_string(), "x".to_string()),
            ]
        );
        assert_eq!(node.attribute("class"), Some("b"));
        assert_eq!(node.attribute("missing"), None);
    }

    #[test]
    fn test_builder_preserves_child_order() {
        let node = Node::new("p")
            .with_child(Node::new("b").with_text("Hello"))
            .with_text(", ")
            .with_child(Node::new("u").with_text("World"))
            .with_text("!");

        assert_eq!(node.children.len(), 4);
        assert!(matches!(node.children[1], Content::Text(ref t) if t == ", "));
    }
}
