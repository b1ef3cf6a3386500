//! Configuration constants, validation functions and the YAML pipeline
//! configuration.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::document::ParseOptions;
use crate::error::{CorpusError, Result};
use crate::normalize::{builtin_rules, load_rules, OrthoPolicy, RuleSpec, SpellingNormalizer};
use crate::restructure::MismatchPolicy;

/// Transient marker set on sentence-final words inside the segmenter.
pub const ATTR_SENT_BREAK: &str = "sent-break";

/// Spelling of a word before normalization.
pub const ATTR_ORTHO: &str = "ortho";

/// Part-of-speech label of a restructured word.
pub const ATTR_POS: &str = "pos";

/// Syntactic category of a phrase node.
pub const ATTR_TYPE: &str = "type";

/// Raw bracket-notation parse string stored on a sentence.
pub const ATTR_PARSE: &str = "parse";

/// 1-based sentence number.
pub const ATTR_NUMBER: &str = "n";

/// Concatenated corrected (normalized) sentence text.
pub const ATTR_CONV_TEXT: &str = "conv-text";

/// Concatenated original-spelling sentence text.
pub const ATTR_ORIG_TEXT: &str = "orig-text";

pub const ATTR_NAME: &str = "name";
pub const ATTR_ID: &str = "id";

/// Tokenisation model used when none is configured.
pub const DEFAULT_TOKENISATION_MODEL: &str = "period";

/// Longest sentence (in words) handed to the external parser by default.
///
/// Constituency parsers degrade badly on very long inputs; early printed
/// prose regularly produces run-on "sentences" of several hundred tokens.
pub const DEFAULT_MAX_PARSE_WORDS: usize = 300;

/// Text wrap width for sentence listings.
pub const TEXT_WRAP_WIDTH: usize = 100;

/// Words on each side of the keyword in a concordance line.
pub const DEFAULT_CONCORDANCE_WINDOW: usize = 5;

/// Document id pattern: dash-separated groups of upper-case letters and digits.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DOCUMENT_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]+(?:-[A-Z0-9]+)*$").expect("valid regex"));

/// Validate a document identifier.
///
/// # Examples
/// ```
/// use corpusparser::config::validate_document_id;
///
/// assert!(validate_document_id("CAXTON-FSOA").is_ok());
/// assert!(validate_document_id("caxton fsoa").is_err());
/// ```
pub fn validate_document_id(id: &str) -> Result<()> {
    if DOCUMENT_ID_PATTERN.is_match(id) {
        Ok(())
    } else {
        Err(CorpusError::InvalidDocumentId(id.to_string()))
    }
}

/// Pipeline settings, usually loaded from a YAML file.
///
/// ```yaml
/// tokenisation_model: period_and_capital
/// rule_sets: [remove_asterisks, ye_caret_to_the]
/// spellings:
///   - { mode: literal, find: "ł", replace: "l" }
/// ortho_policy: first_wins
/// number_sentences: true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Name of the sentence break policy.
    pub tokenisation_model: String,

    /// Built-in spelling rule sets, applied in order before `spellings`.
    pub rule_sets: Vec<String>,

    /// JSON spellings file, applied after the rule sets.
    pub spellings_file: Option<PathBuf>,

    /// Additional spelling rules, applied last.
    pub spellings: Vec<RuleSpec>,

    pub ortho_policy: OrthoPolicy,

    /// Apply Unicode NFC to word text before the spelling rules.
    pub unicode_nfc: bool,

    pub number_sentences: bool,

    /// Add corrected sentence text (`conv-text`).
    pub sentence_text: bool,

    /// Add original-spelling sentence text (`orig-text`).
    pub original_text: bool,

    pub mismatch_policy: MismatchPolicy,

    /// Longest sentence sent to the parser; `None` disables the bound.
    pub max_parse_words: Option<usize>,

    /// Store the raw parse string on each parsed sentence.
    pub store_parse_string: bool,

    /// Rebuild parsed sentences into phrase trees.
    pub restructure: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tokenisation_model: DEFAULT_TOKENISATION_MODEL.to_string(),
            rule_sets: Vec::new(),
            spellings_file: None,
            spellings: Vec::new(),
            ortho_policy: OrthoPolicy::default(),
            unicode_nfc: false,
            number_sentences: true,
            sentence_text: true,
            original_text: false,
            mismatch_policy: MismatchPolicy::default(),
            max_parse_words: Some(DEFAULT_MAX_PARSE_WORDS),
            store_parse_string: true,
            restructure: true,
        }
    }
}

impl PipelineConfig {
    /// Parse a configuration from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading pipeline configuration");
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Build the spelling normalizer described by this configuration.
    ///
    /// # Errors
    /// Fails with `UnknownRuleSet`, `InvalidPattern`, or a file error for
    /// `spellings_file`, before any word is touched.
    pub fn normalizer(&self) -> Result<SpellingNormalizer> {
        let mut normalizer = SpellingNormalizer::new()
            .with_ortho_policy(self.ortho_policy)
            .with_unicode_nfc(self.unicode_nfc);
        for name in &self.rule_sets {
            normalizer = normalizer.with_rules(builtin_rules(name)?);
        }
        if let Some(path) = &self.spellings_file {
            normalizer = normalizer.with_rules(load_rules(path)?);
        }
        for spec in &self.spellings {
            normalizer = normalizer.with_rule(spec.compile()?);
        }
        Ok(normalizer)
    }

    /// Parse options derived from this configuration.
    #[must_use]
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            store_parse_string: self.store_parse_string,
            restructure: self.restructure,
            mismatch_policy: self.mismatch_policy,
        }
    }
}
