//! Document tree handed to the filter by the rendering pipeline.
//!
//! Parsing is someone else's job; this module only models the tree (tags,
//! ordered attributes, children), offers lookup and mutation of attribute
//! values, and serializes back to HTML so callers can compare output.

mod serialize;

use serde::{Deserialize, Serialize};

/// A single `name="value"` pair. Order within an element is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,
    #[serde(default)]
    pub attrs: Vec<Attribute>,
    #[serde(default)]
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Element(Element),
    Text { text: String },
}

/// Ordered forest of top-level nodes (an HTML fragment).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push(Attribute {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(Node::text(text))
    }

    /// Tag comparison is ASCII case-insensitive (`<IMG>` is an image).
    pub fn is(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    /// Value of the first attribute named `name` (ASCII case-insensitive).
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    /// Mutable access to an existing attribute value. Never inserts.
    pub fn attr_mut(&mut self, name: &str) -> Option<&mut String> {
        self.attrs
            .iter_mut()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| &mut a.value)
    }
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text { text: text.into() }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text { .. } => None,
        }
    }
}

impl From<Element> for Node {
    fn from(e: Element) -> Self {
        Node::Element(e)
    }
}

impl Document {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Single-root convenience for fragments like `<a href="..">..</a>`.
    pub fn from_element(element: Element) -> Self {
        Self {
            nodes: vec![Node::Element(element)],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Visits every element at any depth, parents before children.
    ///
    /// Uses an explicit stack so arbitrarily deep wrapper nesting cannot
    /// overflow the call stack.
    pub fn for_each_element_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut Element),
    {
        let mut stack: Vec<&mut Node> = self.nodes.iter_mut().rev().collect();
        while let Some(node) = stack.pop() {
            if let Node::Element(element) = node {
                f(element);
                stack.extend(element.children.iter_mut().rev());
            }
        }
    }

    /// First element with the given tag in document order (like `at_css("a")`).
    pub fn find_first(&self, tag: &str) -> Option<&Element> {
        let mut stack: Vec<&Node> = self.nodes.iter().rev().collect();
        while let Some(node) = stack.pop() {
            if let Node::Element(element) = node {
                if element.is(tag) {
                    return Some(element);
                }
                stack.extend(element.children.iter().rev());
            }
        }
        None
    }

    pub fn to_html(&self) -> String {
        serialize::to_html(&self.nodes)
    }
}
