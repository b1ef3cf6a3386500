//! The generic corpus tree node.

use super::attributes::Attributes;
use super::kind::{MarkerKind, NodeKind};
use crate::config::ATTR_TYPE;
use crate::error::{CorpusError, Result};

/// A node in the corpus tree.
///
/// Every node exclusively owns its children, so the tree is acyclic and
/// each node has exactly one parent. `Clone` produces a fully independent
/// deep copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    kind: NodeKind,
    text: Option<String>,
    attributes: Attributes,
    children: Vec<Node>,
}

impl Node {
    /// Create a node of the given kind with no text.
    #[must_use]
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            text: None,
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    /// Create a node of the given kind with text.
    #[must_use]
    pub fn with_text(kind: NodeKind, text: impl Into<String>) -> Self {
        let mut node = Self::new(kind);
        node.text = Some(text.into());
        node
    }

    #[must_use]
    pub fn document() -> Self {
        Self::new(NodeKind::Document)
    }

    #[must_use]
    pub fn sentence() -> Self {
        Self::new(NodeKind::Sentence)
    }

    /// Create a word node.
    #[must_use]
    pub fn word(text: impl Into<String>) -> Self {
        Self::with_text(NodeKind::Word, text)
    }

    #[must_use]
    pub fn marker(kind: MarkerKind) -> Self {
        Self::new(NodeKind::Marker(kind))
    }

    /// Create a phrase node tagged with a syntactic category.
    #[must_use]
    pub fn phrase(category: impl Into<String>) -> Self {
        let mut node = Self::new(NodeKind::Phrase);
        node.attributes.set(ATTR_TYPE, category);
        node
    }

    /// Builder-style attribute setter.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.set(key, value);
        self
    }

    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    #[must_use]
    pub fn tag(&self) -> &'static str {
        self.kind.tag()
    }

    #[must_use]
    pub fn is_word(&self) -> bool {
        self.kind == NodeKind::Word
    }

    #[must_use]
    pub fn is_marker(&self) -> bool {
        self.kind.is_marker()
    }

    // Text

    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    // Attributes

    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key)
    }

    #[must_use]
    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains(key)
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.set(key, value);
    }

    /// Delete an attribute, returning the previous value.
    pub fn remove_attribute(&mut self, key: &str) -> Option<String> {
        self.attributes.remove(key)
    }

    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn clear_attributes(&mut self) {
        self.attributes.clear();
    }

    // Children

    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Get a direct child by index.
    ///
    /// # Errors
    /// Returns `IndexOutOfRange` if `index` is past the last child.
    pub fn child(&self, index: usize) -> Result<&Node> {
        let len = self.children.len();
        self.children
            .get(index)
            .ok_or(CorpusError::IndexOutOfRange {
                index,
                len,
                what: "children",
            })
    }

    /// Get a mutable direct child by index.
    ///
    /// # Errors
    /// Returns `IndexOutOfRange` if `index` is past the last child.
    pub fn child_mut(&mut self, index: usize) -> Result<&mut Node> {
        let len = self.children.len();
        self.children
            .get_mut(index)
            .ok_or(CorpusError::IndexOutOfRange {
                index,
                len,
                what: "children",
            })
    }

    /// Append a child.
    ///
    /// # Errors
    /// Returns `LeafNode` if this node is a word.
    pub fn append(&mut self, child: Node) -> Result<()> {
        if self.is_word() {
            return Err(CorpusError::LeafNode);
        }
        self.children.push(child);
        Ok(())
    }

    /// Insert a child at `index`, shifting later children right.
    ///
    /// # Errors
    /// Returns `LeafNode` for words and `IndexOutOfRange` if `index > len`.
    pub fn insert(&mut self, index: usize, child: Node) -> Result<()> {
        if self.is_word() {
            return Err(CorpusError::LeafNode);
        }
        if index > self.children.len() {
            return Err(CorpusError::IndexOutOfRange {
                index,
                len: self.children.len(),
                what: "children",
            });
        }
        self.children.insert(index, child);
        Ok(())
    }

    /// Remove and return the child at `index`.
    ///
    /// # Errors
    /// Returns `IndexOutOfRange` if `index` is past the last child.
    pub fn remove(&mut self, index: usize) -> Result<Node> {
        if index >= self.children.len() {
            return Err(CorpusError::IndexOutOfRange {
                index,
                len: self.children.len(),
                what: "children",
            });
        }
        Ok(self.children.remove(index))
    }

    /// Detach all children, leaving this node empty.
    ///
    /// This is the snapshot half of snapshot-and-rebuild: the returned
    /// nodes share nothing with the live tree, so a pass can stream from
    /// them while appending to `self`.
    pub fn take_children(&mut self) -> Vec<Node> {
        std::mem::take(&mut self.children)
    }

    /// Remove all children while keeping text and attributes.
    pub fn clear_children(&mut self) {
        self.children.clear();
    }

    // Traversal

    /// Iterate over all descendants in pre-order, excluding `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![self.children.iter()],
        }
    }

    /// Iterate over descendants of one kind in pre-order.
    pub fn descendants_of(&self, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.descendants().filter(move |n| n.kind == kind)
    }

    /// Iterate over all word descendants in document order.
    pub fn words(&self) -> impl Iterator<Item = &Node> {
        self.descendants_of(NodeKind::Word)
    }

    /// Iterate over all sentence descendants in document order.
    pub fn sentences(&self) -> impl Iterator<Item = &Node> {
        self.descendants_of(NodeKind::Sentence)
    }

    /// Visit every descendant mutably in pre-order.
    pub fn walk_mut<F: FnMut(&mut Node)>(&mut self, f: &mut F) {
        for child in &mut self.children {
            f(child);
            child.walk_mut(f);
        }
    }

    /// Visit every descendant of one kind mutably in pre-order.
    pub fn for_each_of_mut<F: FnMut(&mut Node)>(&mut self, kind: NodeKind, mut f: F) {
        self.walk_mut(&mut |node| {
            if node.kind == kind {
                f(node);
            }
        });
    }

    /// Count descendants of one kind.
    #[must_use]
    pub fn count_of(&self, kind: NodeKind) -> usize {
        self.descendants_of(kind).count()
    }

    /// Text of every descendant of one kind; nodes without text are skipped.
    #[must_use]
    pub fn texts_of(&self, kind: NodeKind) -> Vec<&str> {
        self.descendants_of(kind).filter_map(Node::text).collect()
    }

    /// Get the `index`-th descendant of one kind.
    ///
    /// # Errors
    /// Returns `IndexOutOfRange` if there are not enough such descendants.
    pub fn nth_of(&self, kind: NodeKind, index: usize) -> Result<&Node> {
        self.descendants_of(kind)
            .nth(index)
            .ok_or_else(|| CorpusError::IndexOutOfRange {
                index,
                len: self.count_of(kind),
                what: kind.tag(),
            })
    }

    /// Get a word by sentence index and word index within that sentence.
    ///
    /// # Errors
    /// Returns `IndexOutOfRange` if either index is out of range.
    pub fn word_in_sentence(&self, sentence_index: usize, word_index: usize) -> Result<&Node> {
        self.nth_of(NodeKind::Sentence, sentence_index)?
            .nth_of(NodeKind::Word, word_index)
    }
}

/// Pre-order iterator over a node's descendants.
pub struct Descendants<'a> {
    stack: Vec<std::slice::Iter<'a, Node>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<&'a Node> {
        loop {
            let iter = self.stack.last_mut()?;
            match iter.next() {
                Some(node) => {
                    self.stack.push(node.children.iter());
                    return Some(node);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}
