//! Node kinds and their XML tag names.

use crate::error::{CorpusError, Result};

/// Structural content interleaved with words in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    /// Start of a new page (`<newpage>`).
    PageBreak,
    /// Start of a new folio (`<newfolio>`).
    FolioBreak,
    /// Editorial comment (`<comment>`).
    Comment,
    /// Footnote (`<footnote>`).
    Footnote,
    /// Untokenised running text (`<text>`), produced by the basic import stage.
    RawText,
}

/// Kind tag of a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    Sentence,
    Word,
    /// Non-terminal carrying a syntactic category in its `type` attribute.
    Phrase,
    Marker(MarkerKind),
}

impl NodeKind {
    /// Get the XML tag name for this kind.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Sentence => "s",
            Self::Word => "w",
            Self::Phrase => "phr",
            Self::Marker(MarkerKind::PageBreak) => "newpage",
            Self::Marker(MarkerKind::FolioBreak) => "newfolio",
            Self::Marker(MarkerKind::Comment) => "comment",
            Self::Marker(MarkerKind::Footnote) => "footnote",
            Self::Marker(MarkerKind::RawText) => "text",
        }
    }

    /// Parse a kind from its XML tag name.
    ///
    /// # Errors
    /// Returns `UnknownElement` for tags with no corresponding kind.
    pub fn from_tag(tag: &str) -> Result<Self> {
        Ok(match tag {
            "document" => Self::Document,
            "s" => Self::Sentence,
            "w" => Self::Word,
            "phr" => Self::Phrase,
            "newpage" => Self::Marker(MarkerKind::PageBreak),
            "newfolio" => Self::Marker(MarkerKind::FolioBreak),
            "comment" => Self::Marker(MarkerKind::Comment),
            "footnote" => Self::Marker(MarkerKind::Footnote),
            "text" => Self::Marker(MarkerKind::RawText),
            _ => {
                return Err(CorpusError::UnknownElement {
                    tag_name: tag.to_string(),
                    context: None,
                })
            }
        })
    }

    #[must_use]
    pub fn is_marker(&self) -> bool {
        matches!(self, Self::Marker(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_round_trip_for_markers() {
        for marker in [
            MarkerKind::PageBreak,
            MarkerKind::FolioBreak,
            MarkerKind::Comment,
            MarkerKind::Footnote,
            MarkerKind::RawText,
        ] {
            let kind = NodeKind::Marker(marker);
            assert_eq!(NodeKind::from_tag(kind.tag()).unwrap(), kind);
        }
    }

    #[test]
    fn test_from_tag_unknown() {
        let err = NodeKind::from_tag("lijst").unwrap_err();
        assert!(err.to_string().contains("<lijst>"));
    }
}
