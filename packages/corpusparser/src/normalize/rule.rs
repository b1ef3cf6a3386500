//! Spelling substitution rules.

use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{CorpusError, Result};

/// How a rule's `find` string is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleMode {
    /// Plain substring, replaced wherever it occurs.
    Literal,
    /// Regular expression that must match at the start of the word.
    Pattern,
}

/// Serializable description of a rule, as found in configuration and
/// spellings files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSpec {
    pub mode: RuleMode,
    pub find: String,
    #[serde(default)]
    pub replace: String,
}

impl RuleSpec {
    /// Compile into a rule.
    ///
    /// # Errors
    /// Returns `InvalidPattern` if a pattern rule does not compile.
    pub fn compile(&self) -> Result<SpellingRule> {
        match self.mode {
            RuleMode::Literal => Ok(SpellingRule::literal(&self.find, &self.replace)),
            RuleMode::Pattern => SpellingRule::pattern(&self.find, &self.replace),
        }
    }
}

/// A compiled spelling substitution.
#[derive(Debug, Clone)]
pub enum SpellingRule {
    /// Replace every occurrence of `find`.
    Literal { find: String, replace: String },

    /// When `anchored` matches at the start of the text, replace every
    /// match of `regex`. Replacements use `$1` / `${name}` group syntax.
    Pattern {
        regex: Regex,
        anchored: Regex,
        replace: String,
    },
}

impl SpellingRule {
    /// Create a literal substring rule.
    #[must_use]
    pub fn literal(find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self::Literal {
            find: find.into(),
            replace: replace.into(),
        }
    }

    /// Create a match-at-start pattern rule.
    ///
    /// # Errors
    /// Returns `InvalidPattern` if the pattern does not compile.
    pub fn pattern(pattern: &str, replace: impl Into<String>) -> Result<Self> {
        let compile = |source: &str| {
            Regex::new(source).map_err(|source| CorpusError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
        };
        let regex = compile(pattern)?;
        let anchored = compile(&format!("^(?:{pattern})"))?;
        Ok(Self::Pattern {
            regex,
            anchored,
            replace: replace.into(),
        })
    }

    /// Apply the rule, returning the new text if it differs from `text`.
    #[must_use]
    pub fn apply(&self, text: &str) -> Option<String> {
        let replaced = match self {
            Self::Literal { find, replace } => {
                if find.is_empty() || !text.contains(find.as_str()) {
                    return None;
                }
                text.replace(find.as_str(), replace)
            }
            Self::Pattern {
                regex,
                anchored,
                replace,
            } => {
                if !anchored.is_match(text) {
                    return None;
                }
                regex.replace_all(text, replace.as_str()).into_owned()
            }
        };

        (replaced != text).then_some(replaced)
    }
}

/// Parse a JSON spellings document: an array of rule specifications.
///
/// ```json
/// [
///   { "mode": "literal", "find": "y^e", "replace": "the" },
///   { "mode": "pattern", "find": "hym$", "replace": "him" }
/// ]
/// ```
pub fn rules_from_json(json: &str) -> Result<Vec<SpellingRule>> {
    let specs: Vec<RuleSpec> = serde_json::from_str(json)?;
    specs.iter().map(RuleSpec::compile).collect()
}

/// Load and compile a JSON spellings file.
pub fn load_rules(path: &Path) -> Result<Vec<SpellingRule>> {
    tracing::debug!(path = %path.display(), "Loading spellings file");
    let json = std::fs::read_to_string(path)?;
    rules_from_json(&json)
}
