//! Import of COLMEP-format transcriptions.
//!
//! A COLMEP file is running text with empty or near-empty elements for page
//! and folio breaks, editorial comments and footnotes dropped in between:
//!
//! ```xml
//! <document>
//! <newpage pageno="1"/><comment comtext="First page with title"/>
//! ¶ Here begynneth the boke ...
//! </document>
//! ```
//!
//! Import runs in two stages. The basic stage flattens every element below
//! the root into a sibling list and turns the text between elements into
//! raw-text markers. The standard stage splits raw text into word nodes on
//! whitespace and keeps only the page-break, folio-break, comment and
//! footnote markers.

use std::path::Path;

use roxmltree::{Document as XmlDocument, Node as XmlNode};

use super::utils::{collect_attributes, get_tag_name, non_blank};
use crate::document::Document;
use crate::error::Result;
use crate::tree::{MarkerKind, Node, NodeKind};

/// Markers that survive the standard stage.
const KEPT_MARKERS: &[MarkerKind] = &[
    MarkerKind::PageBreak,
    MarkerKind::FolioBreak,
    MarkerKind::Comment,
    MarkerKind::Footnote,
];

/// Import a COLMEP file as a flat document of words and markers.
///
/// # Arguments
/// * `xml` - COLMEP source text
/// * `name` - Name stored on the document root
///
/// # Errors
/// Returns `XmlParse` if `xml` is not well-formed.
pub fn import_colmep(xml: &str, name: &str) -> Result<Document> {
    let mut document = import_colmep_basic(xml, name)?;
    convert_basic_to_standard(&mut document)?;
    Ok(document)
}

/// Read and import a COLMEP file.
pub fn import_colmep_file(path: &Path, name: &str) -> Result<Document> {
    tracing::debug!(path = %path.display(), name, "Importing COLMEP file");
    let xml = std::fs::read_to_string(path)?;
    import_colmep(&xml, name)
}

/// Basic stage: flatten elements in document order and keep the text
/// between them as raw-text markers.
///
/// Elements that are not markers are dropped together with
/// their own text; the text following them is kept.
pub fn import_colmep_basic(xml: &str, name: &str) -> Result<Document> {
    let source = XmlDocument::parse(xml)?;
    let root = source.root_element();
    let mut document = Document::new(name);

    if let Some(text) = non_blank(root.text()) {
        document.root_mut().append(raw_text(text))?;
    }

    for element in root.descendants().filter(|n| n.is_element() && *n != root) {
        match flatten_element(element) {
            Some(node) => document.root_mut().append(node)?,
            None => tracing::warn!(tag = get_tag_name(element), "Dropping unsupported COLMEP element"),
        }

        if let Some(tail) = non_blank(element.tail()) {
            document.root_mut().append(raw_text(tail))?;
        }
    }

    tracing::debug!(
        name,
        nodes = document.root().children().len(),
        "Imported COLMEP basic form"
    );
    Ok(document)
}

/// Standard stage: expand raw text into words and keep the known markers.
///
/// Returns the number of words in the result.
pub fn convert_basic_to_standard(document: &mut Document) -> Result<usize> {
    let root = document.root_mut();
    let mut words = 0;

    for node in root.take_children() {
        match node.kind() {
            NodeKind::Marker(MarkerKind::RawText) => {
                for token in node.text().unwrap_or_default().split_whitespace() {
                    root.append(Node::word(token))?;
                    words += 1;
                }
            }
            NodeKind::Marker(kind) if KEPT_MARKERS.contains(&kind) => {
                root.append(node)?;
            }
            NodeKind::Word => {
                root.append(node)?;
                words += 1;
            }
            other => tracing::debug!(tag = other.tag(), "Dropping node from standard form"),
        }
    }

    Ok(words)
}

/// A node for a flattened element; the element's children are not copied.
fn flatten_element(element: XmlNode<'_, '_>) -> Option<Node> {
    let kind = NodeKind::from_tag(get_tag_name(element)).ok()?;
    if !kind.is_marker() {
        return None;
    }

    let mut node = Node::new(kind);
    for (key, value) in collect_attributes(element).iter() {
        node.set_attribute(key, value);
    }
    if let Some(text) = element.text() {
        node.set_text(text);
    }
    Some(node)
}

fn raw_text(text: &str) -> Node {
    Node::with_text(NodeKind::Marker(MarkerKind::RawText), text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ATTR_NAME;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"<document>
<newpage pageno="1"/><comment comtext="First page with title">x</comment>
¶ Here begynneth the
boke <footnote n="1">a note</footnote> of Eneydos .
<newfolio folio="2r"/><unclear>lost</unclear> Thenne
</document>"#;

    #[test]
    fn test_basic_stage_is_flat() {
        let doc = import_colmep_basic(SAMPLE, "Test document").unwrap();
        assert_eq!(doc.root().attribute(ATTR_NAME), Some("Test document"));

        let tags: Vec<&str> = doc.root().children().iter().map(Node::tag).collect();
        assert_eq!(
            tags,
            vec!["newpage", "comment", "text", "footnote", "text", "newfolio", "text"]
        );
        assert_eq!(doc.root().child(3).unwrap().text(), Some("a note"));
    }

    #[test]
    fn test_standard_stage_words_and_markers() {
        let doc = import_colmep(SAMPLE, "Test document").unwrap();
        let root = doc.root();

        assert_eq!(
            root.texts_of(NodeKind::Word),
            vec!["¶", "Here", "begynneth", "the", "boke", "of", "Eneydos", ".", "Thenne"]
        );
        assert_eq!(
            root.child(0).unwrap().attribute("pageno"),
            Some("1")
        );
        assert_eq!(
            root.child(1).unwrap().attribute("comtext"),
            Some("First page with title")
        );
        assert_eq!(root.count_of(NodeKind::Marker(MarkerKind::RawText)), 0);
        assert_eq!(root.count_of(NodeKind::Marker(MarkerKind::Footnote)), 1);
    }

    #[test]
    fn test_marker_position_between_words() {
        let doc = import_colmep(SAMPLE, "t").unwrap();
        let tags: Vec<&str> = doc.root().children().iter().map(Node::tag).collect();
        let footnote = tags.iter().position(|t| *t == "footnote").unwrap();
        assert_eq!(doc.root().child(footnote - 1).unwrap().text(), Some("boke"));
        assert_eq!(doc.root().child(footnote + 1).unwrap().text(), Some("of"));
    }

    #[test]
    fn test_leading_root_text_is_kept() {
        let doc = import_colmep("<document>First words<newpage/>more</document>", "t").unwrap();
        assert_eq!(doc.root().texts_of(NodeKind::Word), vec!["First", "words", "more"]);
    }

    #[test]
    fn test_malformed_xml() {
        assert!(import_colmep("<document><newpage></document>", "t").is_err());
    }
}
