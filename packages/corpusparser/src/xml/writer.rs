//! XML serialization of document trees.

use std::fmt::Write as _;
use std::path::Path;

use quick_xml::escape::escape;

use crate::error::{CorpusError, Result};
use crate::tree::Node;

/// Output settings for [`write_tree`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Spaces per nesting level; `None` writes everything on one line.
    pub indent: Option<usize>,
    /// Start with an `<?xml ...?>` declaration.
    pub declaration: bool,
}

impl WriteOptions {
    /// Indented output with a declaration, as written to files.
    #[must_use]
    pub fn pretty() -> Self {
        Self {
            indent: Some(2),
            declaration: true,
        }
    }
}

/// Serialize a tree to XML text.
///
/// Element text is written directly after the start tag; children follow,
/// each on its own line when indenting. Leaf text is never padded, so word
/// text survives a round trip through [`read_tree`](super::read_tree).
///
/// # Examples
/// ```
/// use corpusparser::tree::Node;
/// use corpusparser::xml::{write_tree, WriteOptions};
///
/// let mut s = Node::sentence().with_attribute("n", "1");
/// s.append(Node::word("y^e").with_attribute("ortho", "*y^e")).unwrap();
///
/// let xml = write_tree(&s, &WriteOptions::default()).unwrap();
/// assert_eq!(xml, r#"<s n="1"><w ortho="*y^e">y^e</w></s>"#);
/// ```
pub fn write_tree(node: &Node, options: &WriteOptions) -> Result<String> {
    let mut out = String::new();
    if options.declaration {
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    }
    write_node(&mut out, node, options.indent, 0)
        .map_err(|e| CorpusError::XmlWrite(e.to_string()))?;
    if options.indent.is_some() || options.declaration {
        out.push('\n');
    }
    Ok(out)
}

/// Compact XML without a declaration.
pub fn to_xml_string(node: &Node) -> Result<String> {
    write_tree(node, &WriteOptions::default())
}

/// Write a tree to a file.
pub fn write_tree_file(path: &Path, node: &Node, options: &WriteOptions) -> Result<()> {
    let xml = write_tree(node, options)?;
    std::fs::write(path, &xml)?;
    tracing::debug!(path = %path.display(), bytes = xml.len(), "Wrote XML");
    Ok(())
}

fn write_node(out: &mut String, node: &Node, indent: Option<usize>, depth: usize) -> std::fmt::Result {
    let tag = node.tag();
    write!(out, "<{tag}")?;
    for (key, value) in node.attributes().iter() {
        write!(out, " {key}=\"{}\"", escape(value))?;
    }

    if node.children().is_empty() && node.text().is_none() {
        return out.write_str("/>");
    }

    out.write_char('>')?;
    if let Some(text) = node.text() {
        out.write_str(&escape(text))?;
    }

    if !node.children().is_empty() {
        for child in node.children() {
            newline(out, indent, depth + 1)?;
            write_node(out, child, indent, depth + 1)?;
        }
        newline(out, indent, depth)?;
    }

    write!(out, "</{tag}>")
}

fn newline(out: &mut String, indent: Option<usize>, depth: usize) -> std::fmt::Result {
    if let Some(width) = indent {
        writeln!(out)?;
        write!(out, "{:width$}", "", width = width * depth)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{MarkerKind, NodeKind};
    use pretty_assertions::assert_eq;

    fn sample() -> Node {
        let mut doc = Node::document().with_attribute("name", "Test & co");
        doc.append(Node::marker(MarkerKind::PageBreak).with_attribute("pageno", "1"))
            .unwrap();
        let mut s = Node::sentence();
        s.append(Node::word("<b>")).unwrap();
        s.append(Node::word(".")).unwrap();
        doc.append(s).unwrap();
        doc
    }

    #[test]
    fn test_compact_output_escapes() {
        let xml = to_xml_string(&sample()).unwrap();
        assert_eq!(
            xml,
            r#"<document name="Test &amp; co"><newpage pageno="1"/><s><w>&lt;b&gt;</w><w>.</w></s></document>"#
        );
    }

    #[test]
    fn test_pretty_output() {
        let xml = write_tree(&sample(), &WriteOptions::pretty()).unwrap();
        let expected = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<document name=\"Test &amp; co\">
  <newpage pageno=\"1\"/>
  <s>
    <w>&lt;b&gt;</w>
    <w>.</w>
  </s>
</document>
";
        assert_eq!(xml, expected);
    }

    #[test]
    fn test_text_and_children() {
        let mut s = Node::with_text(NodeKind::Sentence, "Go");
        s.append(Node::word("Go")).unwrap();
        assert_eq!(to_xml_string(&s).unwrap(), "<s>Go<w>Go</w></s>");
    }

    #[test]
    fn test_write_tree_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xml");
        write_tree_file(&path, &sample(), &WriteOptions::default()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<document"));
    }
}
