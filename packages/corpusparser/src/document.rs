//! Document wrapper that applies the transformation passes in pipeline order.

use crate::config::{
    validate_document_id, PipelineConfig, ATTR_CONV_TEXT, ATTR_ID, ATTR_NAME, ATTR_NUMBER,
    ATTR_ORIG_TEXT, ATTR_ORTHO, ATTR_PARSE,
};
use crate::error::{CorpusError, Result};
use crate::normalize::SpellingNormalizer;
use crate::restructure::{MismatchPolicy, ParserHandle, RestructureOutcome, Restructurer};
use crate::segment::{create_default_policies, BreakPolicy, Segmenter};
use crate::tree::{Node, NodeKind};

/// Options for [`Document::parse_sentences`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Store the raw parse string in the sentence's `parse` attribute.
    pub store_parse_string: bool,
    /// Rebuild each parsed sentence into phrase nodes.
    pub restructure: bool,
    pub mismatch_policy: MismatchPolicy,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            store_parse_string: true,
            restructure: true,
            mismatch_policy: MismatchPolicy::default(),
        }
    }
}

/// Per-sentence outcomes of a parsing pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseReport {
    /// Sentences for which the parser returned a parse.
    pub parsed: usize,
    /// Parsed sentences rebuilt with every word matched to a terminal.
    pub restructured: usize,
    /// Sentences the parser could not (or would not) parse.
    pub unparseable: usize,
    /// Parsed sentences whose terminals did not match their words.
    pub mismatched: usize,
    /// Sentences already restructured by an earlier pass.
    pub skipped: usize,
}

impl ParseReport {
    /// Total number of sentences seen.
    #[must_use]
    pub fn sentences(&self) -> usize {
        self.parsed + self.unparseable + self.skipped
    }

    /// Add another report's counts to this one.
    pub fn merge(&mut self, other: &ParseReport) {
        self.parsed += other.parsed;
        self.restructured += other.restructured;
        self.unparseable += other.unparseable;
        self.mismatched += other.mismatched;
        self.skipped += other.skipped;
    }
}

/// A named document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Node,
}

impl Document {
    /// Create an empty document.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            root: Node::document().with_attribute(ATTR_NAME, name),
        }
    }

    /// Wrap an existing tree.
    ///
    /// # Errors
    /// Returns `UnknownElement` if `root` is not a document node.
    pub fn from_root(root: Node) -> Result<Self> {
        if root.kind() != NodeKind::Document {
            return Err(CorpusError::UnknownElement {
                tag_name: root.tag().to_string(),
                context: Some("document root".to_string()),
            });
        }
        Ok(Self { root })
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.root.attribute(ATTR_NAME)
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.root.set_attribute(ATTR_NAME, name);
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.root.attribute(ATTR_ID)
    }

    /// Set the document identifier, e.g. `CAXTON-FSOA`.
    ///
    /// # Errors
    /// Returns `InvalidDocumentId` if the id is malformed.
    pub fn set_id(&mut self, id: &str) -> Result<()> {
        validate_document_id(id)?;
        self.root.set_attribute(ATTR_ID, id);
        Ok(())
    }

    #[must_use]
    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    #[must_use]
    pub fn into_root(self) -> Node {
        self.root
    }

    #[must_use]
    pub fn sentence_count(&self) -> usize {
        self.root.count_of(NodeKind::Sentence)
    }

    #[must_use]
    pub fn word_count(&self) -> usize {
        self.root.count_of(NodeKind::Word)
    }

    /// Segment into sentences using a registered tokenisation model.
    ///
    /// # Errors
    /// Returns `UnknownTokenisationModel` for an unregistered model name and
    /// `AlreadySegmented` if the document has sentences.
    pub fn tokenise_sentences(&mut self, model: &str) -> Result<usize> {
        let policies = create_default_policies();
        let policy = policies.get(model)?;
        self.tokenise_sentences_with(policy)
    }

    /// Segment into sentences using a caller-supplied break policy.
    pub fn tokenise_sentences_with(&mut self, policy: impl BreakPolicy) -> Result<usize> {
        Segmenter::new(policy).segment(&mut self.root)
    }

    /// Apply spelling normalization. Returns the number of words changed.
    pub fn normalize(&mut self, normalizer: &SpellingNormalizer) -> usize {
        normalizer.normalize(&mut self.root)
    }

    /// Store the corrected text of every sentence in `conv-text`.
    ///
    /// Sentences without word text are left alone.
    pub fn add_text_to_sentences(&mut self) {
        self.root.for_each_of_mut(NodeKind::Sentence, |sentence| {
            let text = corrected_text(sentence);
            if !text.is_empty() {
                sentence.set_attribute(ATTR_CONV_TEXT, text);
            }
        });
    }

    /// Store the original-spelling text of every sentence in `orig-text`.
    pub fn add_original_text_to_sentences(&mut self) {
        self.root.for_each_of_mut(NodeKind::Sentence, |sentence| {
            let text = original_text(sentence);
            if !text.is_empty() {
                sentence.set_attribute(ATTR_ORIG_TEXT, text);
            }
        });
    }

    /// Number sentences from 1 in document order (`n`).
    pub fn number_sentences(&mut self) {
        let mut n = 0usize;
        self.root.for_each_of_mut(NodeKind::Sentence, |sentence| {
            n += 1;
            sentence.set_attribute(ATTR_NUMBER, n.to_string());
        });
    }

    /// Corrected text of each sentence, in order.
    #[must_use]
    pub fn sentence_texts(&self) -> Vec<String> {
        self.root.sentences().map(corrected_text).collect()
    }

    /// Original-spelling text of each sentence, in order.
    #[must_use]
    pub fn original_sentence_texts(&self) -> Vec<String> {
        self.root.sentences().map(original_text).collect()
    }

    /// Parse every sentence and optionally restructure it.
    ///
    /// An unparseable or mismatched sentence never stops the pass; the
    /// report tallies what happened to each.
    pub fn parse_sentences(&mut self, parser: &ParserHandle, options: &ParseOptions) -> ParseReport {
        let restructurer = Restructurer::new(options.mismatch_policy);
        let mut report = ParseReport::default();

        self.root.for_each_of_mut(NodeKind::Sentence, |sentence| {
            if sentence.descendants_of(NodeKind::Phrase).next().is_some() {
                report.skipped += 1;
                return;
            }

            let words = sentence.texts_of(NodeKind::Word);
            let Some(parse) = parser.parse_words(&words) else {
                tracing::warn!(
                    sentence = sentence.attribute(ATTR_NUMBER).unwrap_or("?"),
                    words = words.len(),
                    "Sentence could not be parsed"
                );
                report.unparseable += 1;
                return;
            };
            report.parsed += 1;

            if options.store_parse_string {
                sentence.set_attribute(ATTR_PARSE, parse.as_str());
            }
            if !options.restructure {
                return;
            }

            match restructurer.restructure(sentence, &parse) {
                Ok(RestructureOutcome::Restructured) => report.restructured += 1,
                Ok(RestructureOutcome::Mismatched { .. }) => report.mismatched += 1,
                Ok(RestructureOutcome::Unparseable) => report.unparseable += 1,
                Err(e) => {
                    tracing::warn!(error = %e, "Sentence left unstructured");
                    report.mismatched += 1;
                }
            }
        });

        tracing::debug!(
            document = self.name().unwrap_or_default(),
            parsed = report.parsed,
            restructured = report.restructured,
            unparseable = report.unparseable,
            mismatched = report.mismatched,
            skipped = report.skipped,
            "Parsed sentences"
        );
        report
    }

    /// Run segmentation, normalization and the sentence attribute passes
    /// described by `config`.
    ///
    /// The normalizer is built before the tree is touched, so a bad rule
    /// leaves the document unchanged. Returns the number of sentences.
    pub fn run(&mut self, config: &PipelineConfig) -> Result<usize> {
        let normalizer = config.normalizer()?;
        let policies = create_default_policies();
        let policy = policies.get(&config.tokenisation_model)?;

        let sentences = self.tokenise_sentences_with(policy)?;
        let changed = self.normalize(&normalizer);

        if config.number_sentences {
            self.number_sentences();
        }
        if config.sentence_text {
            self.add_text_to_sentences();
        }
        if config.original_text {
            self.add_original_text_to_sentences();
        }

        tracing::debug!(
            document = self.name().unwrap_or_default(),
            sentences,
            changed,
            "Ran pipeline"
        );
        Ok(sentences)
    }

    /// Run the pipeline, then parse with `parser`.
    pub fn run_with_parser(
        &mut self,
        config: &PipelineConfig,
        parser: &ParserHandle,
    ) -> Result<ParseReport> {
        self.run(config)?;
        Ok(self.parse_sentences(parser, &config.parse_options()))
    }
}

fn corrected_text(sentence: &Node) -> String {
    sentence.texts_of(NodeKind::Word).join(" ")
}

fn original_text(sentence: &Node) -> String {
    sentence
        .words()
        .filter_map(|w| w.attribute(ATTR_ORTHO).or_else(|| w.text()))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::SpellingRule;
    use crate::restructure::LookupParser;
    use crate::tree::MarkerKind;
    use pretty_assertions::assert_eq;

    fn document(tokens: &[&str]) -> Document {
        let mut doc = Document::new("test");
        for token in tokens {
            let node = match *token {
                "#page" => Node::marker(MarkerKind::PageBreak),
                text => Node::word(text),
            };
            doc.root_mut().append(node).unwrap();
        }
        doc
    }

    fn lookup(entries: &[(&str, &str)]) -> ParserHandle {
        let mut parser = LookupParser::new();
        for (sentence, parse) in entries {
            parser.insert(*sentence, *parse);
        }
        ParserHandle::new(parser)
    }

    #[test]
    fn test_new_document_has_name() {
        let doc = Document::new("caxton");
        assert_eq!(doc.name(), Some("caxton"));
        assert_eq!(doc.id(), None);
    }

    #[test]
    fn test_set_id() {
        let mut doc = Document::new("caxton");
        doc.set_id("CAXTON-FSOA").unwrap();
        assert_eq!(doc.id(), Some("CAXTON-FSOA"));
        assert!(matches!(
            doc.set_id("caxton"),
            Err(CorpusError::InvalidDocumentId(_))
        ));
        assert_eq!(doc.id(), Some("CAXTON-FSOA"));
    }

    #[test]
    fn test_from_root_rejects_non_document() {
        assert!(Document::from_root(Node::sentence()).is_err());
        assert!(Document::from_root(Node::document()).is_ok());
    }

    #[test]
    fn test_tokenise_sentences_by_model_name() {
        let mut doc = document(&["a", ".", "b", "c", "."]);
        assert_eq!(doc.tokenise_sentences("period").unwrap(), 2);
        assert_eq!(doc.sentence_texts(), vec!["a .", "b c ."]);

        let mut doc = document(&["a"]);
        assert!(matches!(
            doc.tokenise_sentences("semicolon"),
            Err(CorpusError::UnknownTokenisationModel(..))
        ));
    }

    #[test]
    fn test_sentence_text_attributes() {
        let mut doc = document(&["*y^e", "dog", "."]);
        doc.tokenise_sentences("period").unwrap();
        let normalizer = SpellingNormalizer::new()
            .with_rule(SpellingRule::literal("*", ""))
            .with_rule(SpellingRule::literal("y^e", "the"));
        assert_eq!(doc.normalize(&normalizer), 1);

        doc.add_text_to_sentences();
        doc.add_original_text_to_sentences();
        doc.number_sentences();

        let s = doc.root().child(0).unwrap();
        assert_eq!(s.attribute(ATTR_CONV_TEXT), Some("the dog ."));
        assert_eq!(s.attribute(ATTR_ORIG_TEXT), Some("*y^e dog ."));
        assert_eq!(s.attribute(ATTR_NUMBER), Some("1"));
        assert_eq!(doc.original_sentence_texts(), vec!["*y^e dog ."]);
    }

    #[test]
    fn test_number_sentences_in_order() {
        let mut doc = document(&["a", ".", "#page", "b", ".", "c"]);
        doc.tokenise_sentences("period").unwrap();
        doc.number_sentences();

        let numbers: Vec<&str> = doc
            .root()
            .sentences()
            .filter_map(|s| s.attribute(ATTR_NUMBER))
            .collect();
        assert_eq!(numbers, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_parse_sentences_report() {
        let mut doc = document(&["The", "dog", "runs", ".", "Go", ".", "Unknown", "."]);
        doc.tokenise_sentences("period").unwrap();
        let parser = lookup(&[
            (
                "The dog runs .",
                "(S (NP (DT The) (NN dog)) (VP (VBZ runs)) (. .))",
            ),
            ("Go .", "(S (VP (VB Go)))"),
        ]);

        let report = doc.parse_sentences(&parser, &ParseOptions::default());
        assert_eq!(
            report,
            ParseReport {
                parsed: 2,
                restructured: 1,
                unparseable: 1,
                mismatched: 1,
                skipped: 0,
            }
        );
        assert_eq!(report.sentences(), 3);

        let first = doc.root().child(0).unwrap();
        assert!(first.has_attribute(ATTR_PARSE));
        assert_eq!(first.child(0).unwrap().kind(), NodeKind::Phrase);
        // Mismatched sentence keeps both words.
        assert_eq!(doc.root().child(1).unwrap().count_of(NodeKind::Word), 2);
        // Unparseable sentence is untouched.
        let third = doc.root().child(2).unwrap();
        assert!(!third.has_attribute(ATTR_PARSE));
        assert_eq!(third.children().len(), 2);
        assert_eq!(doc.word_count(), 8);
    }

    #[test]
    fn test_parse_without_terminals_counts_unparseable() {
        let mut doc = document(&["Go", "."]);
        doc.tokenise_sentences("period").unwrap();
        let parser = lookup(&[("Go .", "(ROOT")]);

        let report = doc.parse_sentences(&parser, &ParseOptions::default());
        assert_eq!(report.parsed, 1);
        assert_eq!(report.unparseable, 1);
        assert_eq!(report.restructured, 0);

        let s = doc.root().child(0).unwrap();
        assert_eq!(s.attribute(ATTR_PARSE), Some("(ROOT"));
        assert_eq!(s.count_of(NodeKind::Phrase), 0);
        assert_eq!(s.children().len(), 2);
    }

    #[test]
    fn test_parse_sentences_twice_skips_restructured() {
        let mut doc = document(&["Go", "."]);
        doc.tokenise_sentences("period").unwrap();
        let parser = lookup(&[("Go .", "(S (VP (VB Go)) (. .))")]);

        doc.parse_sentences(&parser, &ParseOptions::default());
        let report = doc.parse_sentences(&parser, &ParseOptions::default());
        assert_eq!(report.skipped, 1);
        assert_eq!(report.parsed, 0);
    }

    #[test]
    fn test_parse_without_restructure_stores_parse_only() {
        let mut doc = document(&["Go", "."]);
        doc.tokenise_sentences("period").unwrap();
        let parser = lookup(&[("Go .", "(S (VP (VB Go)) (. .))")]);
        let options = ParseOptions {
            restructure: false,
            ..ParseOptions::default()
        };

        let report = doc.parse_sentences(&parser, &options);
        assert_eq!(report.parsed, 1);
        assert_eq!(report.restructured, 0);
        let s = doc.root().child(0).unwrap();
        assert_eq!(s.attribute(ATTR_PARSE), Some("(S (VP (VB Go)) (. .))"));
        assert_eq!(s.count_of(NodeKind::Phrase), 0);
    }

    #[test]
    fn test_fail_fast_counts_mismatch_and_keeps_sentence() {
        let mut doc = document(&["Go", "."]);
        doc.tokenise_sentences("period").unwrap();
        let before = doc.clone();
        let parser = lookup(&[("Go .", "(S (VP (VB Go)))")]);
        let options = ParseOptions {
            store_parse_string: false,
            mismatch_policy: MismatchPolicy::FailFast,
            ..ParseOptions::default()
        };

        let report = doc.parse_sentences(&parser, &options);
        assert_eq!(report.mismatched, 1);
        assert_eq!(doc, before);
    }

    #[test]
    fn test_run_applies_config() {
        let config = PipelineConfig::from_yaml_str(
            "rule_sets: [remove_asterisks]\noriginal_text: true\n",
        )
        .unwrap();
        let mut doc = document(&["*Here*", "endeth", ".", "#page"]);

        assert_eq!(doc.run(&config).unwrap(), 1);
        let s = doc.root().child(0).unwrap();
        assert_eq!(s.attribute(ATTR_NUMBER), Some("1"));
        assert_eq!(s.attribute(ATTR_CONV_TEXT), Some("Here endeth ."));
        assert_eq!(s.attribute(ATTR_ORIG_TEXT), Some("*Here* endeth ."));
        // Trailing marker goes to the root once the last sentence closed.
        assert_eq!(
            doc.root().child(1).unwrap().kind(),
            NodeKind::Marker(MarkerKind::PageBreak)
        );
    }

    #[test]
    fn test_run_with_bad_rule_leaves_document_untouched() {
        let config = PipelineConfig::from_yaml_str(
            "spellings:\n  - { mode: pattern, find: \"(\" }\n",
        )
        .unwrap();
        let mut doc = document(&["a", "."]);
        let before = doc.clone();

        assert!(matches!(doc.run(&config), Err(CorpusError::InvalidPattern { .. })));
        assert_eq!(doc, before);
    }
}
