//! Read-only aggregation over document trees.
//!
//! Every function takes any node (a document, a sentence, or a corpus
//! root) and looks at its descendants. Empty input is not an error: counts
//! and lengths come back as 0.

use std::collections::HashMap;
use std::fmt;

use crate::config::{ATTR_ID, ATTR_NAME, ATTR_ORTHO};
use crate::tree::{Node, NodeKind};

/// Which spelling of a word to aggregate over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextForm {
    /// The current (normalized) word text.
    #[default]
    Corrected,
    /// The spelling recorded in `ortho`, falling back to the current text.
    Original,
}

impl TextForm {
    /// Spelling of `word` in this form.
    #[must_use]
    pub fn of<'a>(&self, word: &'a Node) -> Option<&'a str> {
        match self {
            Self::Corrected => word.text(),
            Self::Original => word.attribute(ATTR_ORTHO).or_else(|| word.text()),
        }
    }
}

fn word_texts(root: &Node, form: TextForm) -> impl Iterator<Item = &str> {
    root.words().filter_map(move |w| form.of(w))
}

/// Number of words in each sentence, in order.
#[must_use]
pub fn sentence_lengths(root: &Node) -> Vec<usize> {
    root.sentences().map(|s| s.count_of(NodeKind::Word)).collect()
}

#[must_use]
pub fn longest_sentence(root: &Node) -> usize {
    sentence_lengths(root).into_iter().max().unwrap_or(0)
}

#[must_use]
pub fn shortest_sentence(root: &Node) -> usize {
    sentence_lengths(root).into_iter().min().unwrap_or(0)
}

/// Mean sentence length rounded to the nearest word (halves round up).
#[must_use]
pub fn average_sentence_length(root: &Node) -> usize {
    rounded_mean(&sentence_lengths(root))
}

pub(crate) fn rounded_mean(values: &[usize]) -> usize {
    if values.is_empty() {
        return 0;
    }
    let total: usize = values.iter().sum();
    (2 * total + values.len()) / (2 * values.len())
}

/// Word occurrence counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordFrequency {
    counts: HashMap<String, usize>,
}

impl WordFrequency {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, word: &str) {
        *self.counts.entry(word.to_string()).or_insert(0) += 1;
    }

    /// Add another table's counts to this one.
    pub fn merge(&mut self, other: &WordFrequency) {
        for (word, count) in &other.counts {
            *self.counts.entry(word.clone()).or_insert(0) += count;
        }
    }

    #[must_use]
    pub fn count(&self, word: &str) -> usize {
        self.counts.get(word).copied().unwrap_or(0)
    }

    /// Number of distinct words.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total number of occurrences.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// The `n` most frequent words, ties broken alphabetically.
    #[must_use]
    pub fn most_common(&self, n: usize) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> = self
            .counts
            .iter()
            .map(|(word, count)| (word.as_str(), *count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries.truncate(n);
        entries
    }

    /// All entries, most frequent first.
    #[must_use]
    pub fn sorted(&self) -> Vec<(&str, usize)> {
        self.most_common(self.counts.len())
    }
}

impl<'a> FromIterator<&'a str> for WordFrequency {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut frequency = Self::new();
        for word in iter {
            frequency.add(word);
        }
        frequency
    }
}

/// Count every word below `root`.
#[must_use]
pub fn word_frequency(root: &Node, form: TextForm) -> WordFrequency {
    word_texts(root, form).collect()
}

/// Count the words that start with `prefix` (case-sensitive).
#[must_use]
pub fn word_frequency_starts_with(root: &Node, prefix: &str, form: TextForm) -> WordFrequency {
    word_texts(root, form)
        .filter(|w| w.starts_with(prefix))
        .collect()
}

/// Number of word occurrences that exactly match any of `words`.
///
/// Useful for tallying spelling variants:
///
/// ```
/// use corpusparser::stats::{word_count_in, TextForm};
/// use corpusparser::tree::Node;
///
/// let mut s = Node::sentence();
/// for w in ["hym", "and", "him"] {
///     s.append(Node::word(w)).unwrap();
/// }
/// assert_eq!(word_count_in(&s, &["him", "hym", "hyme"], TextForm::Corrected), 2);
/// ```
#[must_use]
pub fn word_count_in(root: &Node, words: &[&str], form: TextForm) -> usize {
    word_texts(root, form).filter(|w| words.contains(w)).count()
}

/// One keyword-in-context line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcordanceLine {
    /// 1-based sentence position within the searched tree.
    pub sentence: usize,
    pub left: Vec<String>,
    pub keyword: String,
    pub right: Vec<String>,
}

impl fmt::Display for ConcordanceLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>5}  {:>40}  [{}]  {}",
            self.sentence,
            self.left.join(" "),
            self.keyword,
            self.right.join(" ")
        )
    }
}

/// Find every occurrence of `keyword` with up to `window` words of context
/// on each side. Context never crosses a sentence boundary.
#[must_use]
pub fn concordance(root: &Node, keyword: &str, window: usize, form: TextForm) -> Vec<ConcordanceLine> {
    let mut lines = Vec::new();

    for (index, sentence) in root.sentences().enumerate() {
        let words: Vec<&str> = word_texts(sentence, form).collect();
        for (i, _) in words.iter().enumerate().filter(|(_, w)| **w == keyword) {
            let start = i.saturating_sub(window);
            let end = i.saturating_add(1).saturating_add(window).min(words.len());
            lines.push(ConcordanceLine {
                sentence: index + 1,
                left: words[start..i].iter().map(|w| (*w).to_string()).collect(),
                keyword: words[i].to_string(),
                right: words[i + 1..end].iter().map(|w| (*w).to_string()).collect(),
            });
        }
    }

    lines
}

/// Summary of a document or corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentInfo {
    pub name: Option<String>,
    pub id: Option<String>,
    pub sentences: usize,
    pub words: usize,
    pub longest_sentence: usize,
    pub shortest_sentence: usize,
    pub average_sentence_length: usize,
}

impl DocumentInfo {
    /// Summarize the tree below `root`.
    #[must_use]
    pub fn from_node(root: &Node) -> Self {
        let lengths = sentence_lengths(root);

        Self {
            name: root.attribute(ATTR_NAME).map(str::to_string),
            id: root.attribute(ATTR_ID).map(str::to_string),
            sentences: lengths.len(),
            words: root.count_of(NodeKind::Word),
            longest_sentence: lengths.iter().copied().max().unwrap_or(0),
            shortest_sentence: lengths.iter().copied().min().unwrap_or(0),
            average_sentence_length: rounded_mean(&lengths),
        }
    }
}

impl fmt::Display for DocumentInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            writeln!(f, "Name: {name}")?;
        }
        if let Some(id) = &self.id {
            writeln!(f, "Id: {id}")?;
        }
        writeln!(f, "Sentences: {}", self.sentences)?;
        writeln!(f, "Words: {}", self.words)?;
        writeln!(f, "Longest sentence: {}", self.longest_sentence)?;
        writeln!(f, "Shortest sentence: {}", self.shortest_sentence)?;
        write!(f, "Average sentence length: {}", self.average_sentence_length)
    }
}
