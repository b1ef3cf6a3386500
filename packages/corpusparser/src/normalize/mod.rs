//! Spelling normalization.
//!
//! Rules come in two modes with deliberately different matching: literal
//! rules replace a substring wherever it occurs, pattern rules only fire
//! when the regex matches at the start of the word. Every changed word
//! keeps a prior spelling in its `ortho` attribute, governed by
//! [`OrthoPolicy`].

mod builtin;
mod normalizer;
mod rule;

pub use builtin::{builtin_rules, BUILTIN_RULE_SETS};
pub use normalizer::{OrthoPolicy, SpellingNormalizer};
pub use rule::{load_rules, rules_from_json, RuleMode, RuleSpec, SpellingRule};
