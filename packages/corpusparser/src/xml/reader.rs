//! Parsing of the XML written by [`write_tree`](super::write_tree).

use std::path::Path;

use roxmltree::{Document as XmlDocument, Node as XmlNode};

use super::utils::{collect_attributes, element_children, get_tag_name, non_blank};
use crate::document::Document;
use crate::error::{CorpusError, Result};
use crate::tree::{Node, NodeKind};

/// Parse XML text into a tree.
///
/// Leaf text is kept exactly; text of elements with element children is
/// trimmed, and dropped when only indentation remains.
///
/// # Errors
/// * `XmlParse` if the text is not well-formed
/// * `UnknownElement` for tags with no node kind, naming the parent
/// * `LeafNode` if a `<w>` element has element children
pub fn read_tree(xml: &str) -> Result<Node> {
    let source = XmlDocument::parse(xml)?;
    convert_element(source.root_element(), None)
}

/// Parse XML text whose root is a `<document>`.
pub fn read_document(xml: &str) -> Result<Document> {
    Document::from_root(read_tree(xml)?)
}

/// Read a document from a file.
pub fn read_document_file(path: &Path) -> Result<Document> {
    tracing::debug!(path = %path.display(), "Reading document");
    let xml = std::fs::read_to_string(path)?;
    read_document(&xml)
}

fn convert_element(element: XmlNode<'_, '_>, parent: Option<&str>) -> Result<Node> {
    let tag = get_tag_name(element);
    let kind = NodeKind::from_tag(tag).map_err(|_| CorpusError::UnknownElement {
        tag_name: tag.to_string(),
        context: parent.map(|p| format!("<{p}>")),
    })?;

    let mut node = Node::new(kind);
    for (key, value) in collect_attributes(element).iter() {
        node.set_attribute(key, value);
    }

    let mut children = element_children(element).peekable();
    let text = if children.peek().is_some() {
        non_blank(element.text()).map(str::trim)
    } else {
        element.text()
    };
    if let Some(text) = text {
        node.set_text(text);
    }

    for child in children {
        node.append(convert_element(child, Some(tag))?)?;
    }

    Ok(node)
}
