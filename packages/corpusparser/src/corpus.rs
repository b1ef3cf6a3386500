//! A named collection of documents with corpus-wide passes and statistics.

use crate::config::PipelineConfig;
use crate::document::{Document, ParseOptions, ParseReport};
use crate::error::Result;
use crate::normalize::SpellingNormalizer;
use crate::restructure::ParserHandle;
use crate::stats::{self, ConcordanceLine, DocumentInfo, TextForm, WordFrequency};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    name: Option<String>,
    documents: Vec<Document>,
}

impl Corpus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn add_document(&mut self, document: Document) {
        self.documents.push(document);
    }

    #[must_use]
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn documents_mut(&mut self) -> &mut [Document] {
        &mut self.documents
    }

    /// Find a document by name.
    #[must_use]
    pub fn document(&self, name: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.name() == Some(name))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    #[must_use]
    pub fn sentence_count(&self) -> usize {
        self.documents.iter().map(Document::sentence_count).sum()
    }

    #[must_use]
    pub fn word_count(&self) -> usize {
        self.documents.iter().map(Document::word_count).sum()
    }

    /// Run the configured pipeline over every document.
    ///
    /// Returns the total number of sentences. Stops at the first document
    /// that fails.
    pub fn run(&mut self, config: &PipelineConfig) -> Result<usize> {
        let mut sentences = 0;
        for document in &mut self.documents {
            sentences += document.run(config)?;
        }
        Ok(sentences)
    }

    /// Normalize every document. Returns the number of words changed.
    pub fn normalize(&mut self, normalizer: &SpellingNormalizer) -> usize {
        self.documents
            .iter_mut()
            .map(|d| d.normalize(normalizer))
            .sum()
    }

    /// Parse every document and combine the reports.
    pub fn parse_sentences(&mut self, parser: &ParserHandle, options: &ParseOptions) -> ParseReport {
        let mut report = ParseReport::default();
        for document in &mut self.documents {
            report.merge(&document.parse_sentences(parser, options));
        }
        report
    }

    /// Corrected text of every sentence across the corpus.
    #[must_use]
    pub fn sentence_texts(&self) -> Vec<String> {
        self.documents
            .iter()
            .flat_map(Document::sentence_texts)
            .collect()
    }

    #[must_use]
    pub fn sentence_lengths(&self) -> Vec<usize> {
        self.documents
            .iter()
            .flat_map(|d| stats::sentence_lengths(d.root()))
            .collect()
    }

    #[must_use]
    pub fn word_frequency(&self, form: TextForm) -> WordFrequency {
        let mut frequency = WordFrequency::new();
        for document in &self.documents {
            frequency.merge(&stats::word_frequency(document.root(), form));
        }
        frequency
    }

    #[must_use]
    pub fn word_frequency_starts_with(&self, prefix: &str, form: TextForm) -> WordFrequency {
        let mut frequency = WordFrequency::new();
        for document in &self.documents {
            frequency.merge(&stats::word_frequency_starts_with(document.root(), prefix, form));
        }
        frequency
    }

    #[must_use]
    pub fn word_count_in(&self, words: &[&str], form: TextForm) -> usize {
        self.documents
            .iter()
            .map(|d| stats::word_count_in(d.root(), words, form))
            .sum()
    }

    /// Concordance lines from every document, paired with the document name.
    #[must_use]
    pub fn concordance(
        &self,
        keyword: &str,
        window: usize,
        form: TextForm,
    ) -> Vec<(Option<&str>, ConcordanceLine)> {
        self.documents
            .iter()
            .flat_map(|d| {
                stats::concordance(d.root(), keyword, window, form)
                    .into_iter()
                    .map(move |line| (d.name(), line))
            })
            .collect()
    }

    /// Summary across all documents.
    #[must_use]
    pub fn info(&self) -> DocumentInfo {
        let lengths = self.sentence_lengths();

        DocumentInfo {
            name: self.name.clone(),
            id: None,
            sentences: lengths.len(),
            words: self.word_count(),
            longest_sentence: lengths.iter().copied().max().unwrap_or(0),
            shortest_sentence: lengths.iter().copied().min().unwrap_or(0),
            average_sentence_length: stats::rounded_mean(&lengths),
        }
    }
}

impl FromIterator<Document> for Corpus {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        Self {
            name: None,
            documents: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Node;
    use pretty_assertions::assert_eq;

    fn document(name: &str, words: &[&str]) -> Document {
        let mut doc = Document::new(name);
        for w in words {
            doc.root_mut().append(Node::word(*w)).unwrap();
        }
        doc.tokenise_sentences("period").unwrap();
        doc
    }

    #[test]
    fn test_empty_corpus() {
        let corpus = Corpus::new();
        assert!(corpus.is_empty());
        assert_eq!(corpus.info(), DocumentInfo::default());
    }

    #[test]
    fn test_counts_across_documents() {
        let corpus: Corpus = vec![
            document("one", &["a", "b", ".", "c", "."]),
            document("two", &["a", "d", "e", "f", "."]),
        ]
        .into_iter()
        .collect();

        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.sentence_count(), 3);
        assert_eq!(corpus.word_count(), 10);
        assert_eq!(corpus.sentence_lengths(), vec![3, 2, 5]);
        assert_eq!(corpus.word_frequency(TextForm::Corrected).count("a"), 2);
        assert_eq!(corpus.word_count_in(&["a", "f"], TextForm::Corrected), 3);
        assert!(corpus.document("two").is_some());
        assert!(corpus.document("three").is_none());
    }

    #[test]
    fn test_info_matches_per_document_rules() {
        let mut corpus = Corpus::new().with_name("colmep");
        corpus.add_document(document("one", &["a", "b", "."]));
        corpus.add_document(document("two", &["c", "."]));

        let info = corpus.info();
        assert_eq!(info.name.as_deref(), Some("colmep"));
        assert_eq!(info.longest_sentence, 3);
        assert_eq!(info.shortest_sentence, 2);
        assert_eq!(info.average_sentence_length, 3);
    }

    #[test]
    fn test_concordance_names_documents() {
        let corpus: Corpus = vec![
            document("one", &["the", "king", "."]),
            document("two", &["a", "king", "rode", "."]),
        ]
        .into_iter()
        .collect();

        let lines = corpus.concordance("king", 2, TextForm::Corrected);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].0, Some("one"));
        assert_eq!(lines[1].0, Some("two"));
        assert_eq!(lines[1].1.right, vec!["rode", "."]);
    }
}
