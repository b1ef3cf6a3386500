//! Spelling normalizer that rewrites word text and records the prior
//! spelling in `ortho`.

use serde::Deserialize;
use unicode_normalization::UnicodeNormalization;

use super::rule::SpellingRule;
use crate::config::ATTR_ORTHO;
use crate::tree::{Node, NodeKind};

/// What happens to `ortho` when an already-normalized word changes again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrthoPolicy {
    /// Keep the first recorded spelling, i.e. the text as imported.
    #[default]
    FirstWins,
    /// Record the spelling just before the most recent change.
    AlwaysOverwrite,
}

/// Applies an ordered list of spelling rules to word nodes.
#[derive(Debug, Clone, Default)]
pub struct SpellingNormalizer {
    rules: Vec<SpellingRule>,
    ortho_policy: OrthoPolicy,
    unicode_nfc: bool,
}

impl SpellingNormalizer {
    /// Create a normalizer with no rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_rule(mut self, rule: SpellingRule) -> Self {
        self.rules.push(rule);
        self
    }

    #[must_use]
    pub fn with_rules(mut self, rules: impl IntoIterator<Item = SpellingRule>) -> Self {
        self.rules.extend(rules);
        self
    }

    #[must_use]
    pub fn with_ortho_policy(mut self, policy: OrthoPolicy) -> Self {
        self.ortho_policy = policy;
        self
    }

    /// Compose word text to Unicode NFC before applying the rules.
    #[must_use]
    pub fn with_unicode_nfc(mut self, enabled: bool) -> Self {
        self.unicode_nfc = enabled;
        self
    }

    #[must_use]
    pub fn rules(&self) -> &[SpellingRule] {
        &self.rules
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && !self.unicode_nfc
    }

    /// Normalize a single word. Returns `true` if its text changed.
    ///
    /// Each rule is a separate step: a rule sees the output of the rules
    /// before it. Non-word nodes and words without text are ignored.
    pub fn normalize_word(&self, word: &mut Node) -> bool {
        if !word.is_word() {
            return false;
        }
        let Some(mut text) = word.text().map(str::to_string) else {
            return false;
        };

        let mut changed = false;

        if self.unicode_nfc {
            let composed: String = text.nfc().collect();
            if composed != text {
                self.stamp_ortho(word, &text);
                text = composed;
                changed = true;
            }
        }

        for rule in &self.rules {
            if let Some(replaced) = rule.apply(&text) {
                self.stamp_ortho(word, &text);
                text = replaced;
                changed = true;
            }
        }

        if changed {
            word.set_text(text);
        }
        changed
    }

    /// Normalize every word below `root`. Returns the number of words changed.
    pub fn normalize(&self, root: &mut Node) -> usize {
        let mut changed = 0;
        root.for_each_of_mut(NodeKind::Word, |word| {
            if self.normalize_word(word) {
                changed += 1;
            }
        });
        tracing::debug!(rules = self.rules.len(), changed, "Normalized spellings");
        changed
    }

    fn stamp_ortho(&self, word: &mut Node, previous: &str) {
        match self.ortho_policy {
            OrthoPolicy::FirstWins if word.has_attribute(ATTR_ORTHO) => {}
            _ => word.set_attribute(ATTR_ORTHO, previous),
        }
    }
}
