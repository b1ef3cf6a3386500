//! Built-in spelling rule sets for early printed English.

use super::rule::SpellingRule;
use crate::error::{CorpusError, Result};

/// Names of the built-in rule sets.
pub const BUILTIN_RULE_SETS: &[&str] = &[
    "remove_asterisks",
    "v_to_u",
    "u_to_v",
    "ye_caret_to_the",
    "lbar_to_l",
];

/// Get the rules of a built-in set.
///
/// - `remove_asterisks`: strips editorial asterisks from words that start
///   with one ("*that*" → "that")
/// - `v_to_u`: word-initial consonantal v before a consonant ("vnto" → "unto")
/// - `u_to_v`: vocalic u between vowels ("haue" → "have")
/// - `ye_caret_to_the`: superscript abbreviation "y^e" → "the"
/// - `lbar_to_l`: barred l → l
///
/// # Errors
/// Returns `UnknownRuleSet` for unknown names.
pub fn builtin_rules(name: &str) -> Result<Vec<SpellingRule>> {
    match name {
        "remove_asterisks" => Ok(vec![SpellingRule::pattern(r"\*", "")?]),
        "v_to_u" => Ok(vec![
            SpellingRule::pattern("v([bcdfghjklmnpqrstvwxz])", "u$1")?,
            SpellingRule::pattern("V([bcdfghjklmnpqrstvwxz])", "U$1")?,
        ]),
        "u_to_v" => Ok(vec![SpellingRule::pattern(
            r"(\w*?[aeiouAEIOU])u([aeiou])",
            "${1}v${2}",
        )?]),
        "ye_caret_to_the" => Ok(vec![
            SpellingRule::literal("y^e", "the"),
            SpellingRule::literal("Y^e", "The"),
        ]),
        "lbar_to_l" => Ok(vec![
            SpellingRule::literal("ł", "l"),
            SpellingRule::literal("Ł", "L"),
        ]),
        _ => Err(CorpusError::UnknownRuleSet(name.to_string())),
    }
}
