//! Sentence break policies.

use crate::tree::Node;

/// Trait for pluggable sentence break policies.
///
/// Implementations decide whether the word at `index` ends its sentence.
/// The segmenter always closes the sentence after the final word, so
/// policies never need to special-case the end of the document.
pub trait BreakPolicy {
    /// Registry name of this policy (e.g. "period").
    fn name(&self) -> &str;

    /// Determine if `words[index]` is the last word of a sentence.
    fn is_break(&self, words: &[&Node], index: usize) -> bool;
}

impl<T: BreakPolicy + ?Sized> BreakPolicy for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn is_break(&self, words: &[&Node], index: usize) -> bool {
        (**self).is_break(words, index)
    }
}

impl<T: BreakPolicy + ?Sized> BreakPolicy for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn is_break(&self, words: &[&Node], index: usize) -> bool {
        (**self).is_break(words, index)
    }
}

/// Breaks after a word whose text is exactly ".".
pub struct PeriodPolicy;

impl BreakPolicy for PeriodPolicy {
    fn name(&self) -> &str {
        "period"
    }

    fn is_break(&self, words: &[&Node], index: usize) -> bool {
        words
            .get(index)
            .and_then(|w| w.text())
            .is_some_and(|text| text == ".")
    }
}

/// Breaks after a period-like word that is followed by a capitalised word.
///
/// Whitespace tokenisation leaves punctuation attached ("Aymon."), so a
/// word is period-like when it ends with a full stop. Requiring a capital
/// on the next word keeps abbreviations and numerals ("ij." "li.") inside
/// their sentence.
pub struct PeriodAndCapitalPolicy;

impl PeriodAndCapitalPolicy {
    fn is_period_like(text: &str) -> bool {
        text.ends_with('.')
    }

    fn starts_with_capital(text: &str) -> bool {
        text.chars().next().is_some_and(char::is_uppercase)
    }
}

impl BreakPolicy for PeriodAndCapitalPolicy {
    fn name(&self) -> &str {
        "period_and_capital"
    }

    fn is_break(&self, words: &[&Node], index: usize) -> bool {
        let Some(current) = words.get(index).and_then(|w| w.text()) else {
            return false;
        };
        let Some(next) = words.get(index + 1).and_then(|w| w.text()) else {
            return false;
        };
        Self::is_period_like(current) && Self::starts_with_capital(next)
    }
}
