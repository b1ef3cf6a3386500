//! Error types for corpusparser.
//!
//! `CorpusError` covers both configuration failures (reported before any
//! node is touched) and guards against re-applying non-idempotent passes.
//! Per-sentence parse failures are not errors; see
//! [`RestructureOutcome`](crate::restructure::RestructureOutcome).

use thiserror::Error;

/// Main error type for the corpusparser library.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// A normalization pattern failed to compile.
    #[error("Invalid spelling pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Unknown sentence tokenisation model.
    #[error("Unknown tokenisation model: '{0}'. Known models: {1}")]
    UnknownTokenisationModel(String, String),

    /// Unknown built-in spelling rule set.
    #[error("Unknown spelling rule set: '{0}'")]
    UnknownRuleSet(String),

    /// The document already contains sentences.
    #[error("Document is already segmented into sentences")]
    AlreadySegmented,

    /// The sentence already contains phrase nodes.
    #[error("Sentence is already restructured into phrases")]
    AlreadyRestructured,

    /// Parse terminals do not line up with the sentence's words.
    #[error("Parse has {terminals} terminals but the sentence has {words} words")]
    StructuralMismatch { terminals: usize, words: usize },

    /// Attempted to give a word node children.
    #[error("Word nodes are leaves and cannot take children")]
    LeafNode,

    /// Indexed access past the end of a sequence.
    #[error("Index {index} out of range for {len} {what}")]
    IndexOutOfRange {
        index: usize,
        len: usize,
        what: &'static str,
    },

    /// Invalid document identifier.
    #[error("Invalid document id: '{0}'. Expected upper-case letters, digits and dashes (e.g., CAXTON-FSOA)")]
    InvalidDocumentId(String),

    /// Unknown XML element encountered.
    #[error("No node kind for element <{tag_name}>{}", .context.as_ref().map(|c| format!(" in {c}")).unwrap_or_default())]
    UnknownElement {
        tag_name: String,
        context: Option<String>,
    },

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// XML writing failed.
    #[error("XML writing failed: {0}")]
    XmlWrite(String),

    /// The external parser could not be run.
    #[error("Parser failed: {0}")]
    Parser(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML configuration error.
    #[error("YAML configuration error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

/// Result type alias for corpusparser operations.
pub type Result<T> = std::result::Result<T, CorpusError>;
