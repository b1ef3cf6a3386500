//! Helpers for navigating roxmltree DOM trees.

use roxmltree::Node as XmlNode;

use crate::tree::Attributes;

/// Get the tag name without namespace prefix.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use corpusparser::xml::get_tag_name;
///
/// let xml = r#"<document><newpage n="2"/></document>"#;
/// let doc = Document::parse(xml).unwrap();
/// let page = doc.root_element().first_element_child().unwrap();
/// assert_eq!(get_tag_name(page), "newpage");
/// ```
pub fn get_tag_name<'a>(node: XmlNode<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Iterate over element children, skipping text, comments and
/// processing instructions.
pub fn element_children<'a, 'input>(
    node: XmlNode<'a, 'input>,
) -> impl Iterator<Item = XmlNode<'a, 'input>> {
    node.children().filter(|child| child.is_element())
}

/// Copy an element's attributes in document order.
pub fn collect_attributes(node: XmlNode<'_, '_>) -> Attributes {
    node.attributes()
        .map(|attr| (attr.name(), attr.value()))
        .collect()
}

/// `Some(text)` unless the text is missing or whitespace only.
///
/// # Examples
/// ```
/// use corpusparser::xml::non_blank;
///
/// assert_eq!(non_blank(Some(" and so ")), Some(" and so "));
/// assert_eq!(non_blank(Some("\n  ")), None);
/// assert_eq!(non_blank(None), None);
/// ```
pub fn non_blank(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}
