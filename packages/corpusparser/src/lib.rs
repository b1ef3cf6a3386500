//! corpusparser - Transform historical English transcriptions into
//! sentence-segmented, spelling-normalized and syntactically structured
//! document trees.
//!
//! # Example
//!
//! ```
//! use corpusparser::config::PipelineConfig;
//! use corpusparser::xml::import_colmep;
//!
//! let xml = r#"<document><newpage pageno="1"/>*Here* begynneth y^e boke . Thenne</document>"#;
//! let mut document = import_colmep(xml, "Eneydos").unwrap();
//!
//! let config = PipelineConfig::from_yaml_str("rule_sets: [remove_asterisks, ye_caret_to_the]").unwrap();
//! assert_eq!(document.run(&config).unwrap(), 2);
//! assert_eq!(document.sentence_texts(), vec!["Here begynneth the boke .", "Thenne"]);
//! ```
//!
//! # Architecture
//!
//! - [`tree`]: Generic attributed node tree
//! - [`segment`]: Sentence segmentation with pluggable break policies
//! - [`normalize`]: Spelling normalization that records prior spellings
//! - [`restructure`]: Phrase trees from constituency parses
//! - [`document`] / [`corpus`]: Pipeline passes over documents and corpora
//! - [`stats`]: Counts, frequencies and concordances
//! - [`xml`]: COLMEP import and tree reading/writing
//! - [`config`]: Constants, validation and the YAML pipeline configuration
//! - [`error`]: Error types and Result alias
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod corpus;
pub mod document;
pub mod error;
pub mod normalize;
pub mod restructure;
pub mod segment;
pub mod stats;
pub mod tree;
pub mod xml;

// Re-export commonly used items
pub use config::{validate_document_id, PipelineConfig};
pub use corpus::Corpus;
pub use document::{Document, ParseOptions, ParseReport};
pub use error::{CorpusError, Result};
pub use tree::{MarkerKind, Node, NodeKind};
