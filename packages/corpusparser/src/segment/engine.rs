//! Segmenter that regroups a flat word stream into sentences.

use super::strategy::BreakPolicy;
use crate::config::ATTR_SENT_BREAK;
use crate::error::{CorpusError, Result};
use crate::tree::{Node, NodeKind};

/// Engine for splitting a document's flat children into sentences.
///
/// Consecutive words become children of new sentence nodes. A marker is
/// attached to the currently open sentence, or to the document root when
/// no sentence is open (before the first word, or between a sentence
/// break and the next word).
pub struct Segmenter<P: BreakPolicy> {
    policy: P,
}

impl<P: BreakPolicy> Segmenter<P> {
    /// Create a new segmenter.
    #[must_use]
    pub fn new(policy: P) -> Self {
        Self { policy }
    }

    /// Segment a document in place and return the number of sentences.
    ///
    /// The last word always ends a sentence. A document without words is
    /// left unchanged.
    ///
    /// # Errors
    /// Returns `AlreadySegmented` if the document already has sentences,
    /// and `LeafNode` if `document` is a word.
    pub fn segment(&self, document: &mut Node) -> Result<usize> {
        if document.is_word() {
            return Err(CorpusError::LeafNode);
        }
        if document.sentences().next().is_some() {
            return Err(CorpusError::AlreadySegmented);
        }

        let mut snapshot = document.take_children();
        let word_count = self.mark_breaks(&mut snapshot);

        let mut open: Option<Node> = None;
        let mut sentences = 0;

        for mut node in snapshot {
            if node.kind() == NodeKind::Word {
                let ends_sentence = node.remove_attribute(ATTR_SENT_BREAK).is_some();
                open.get_or_insert_with(Node::sentence).append(node)?;

                if ends_sentence {
                    if let Some(sentence) = open.take() {
                        document.append(sentence)?;
                        sentences += 1;
                    }
                }
            } else if let Some(sentence) = open.as_mut() {
                sentence.append(node)?;
            } else {
                document.append(node)?;
            }
        }

        tracing::debug!(
            policy = self.policy.name(),
            words = word_count,
            sentences,
            "Segmented document"
        );

        Ok(sentences)
    }

    /// Stamp `sent-break` on every sentence-final word of the snapshot,
    /// replacing any break marks the words arrived with.
    ///
    /// Returns the number of words seen.
    fn mark_breaks(&self, snapshot: &mut [Node]) -> usize {
        let breaks: Vec<bool> = {
            let words: Vec<&Node> = snapshot.iter().filter(|n| n.is_word()).collect();
            let last = words.len().saturating_sub(1);
            (0..words.len())
                .map(|i| i == last || self.policy.is_break(&words, i))
                .collect()
        };

        for (word, is_break) in snapshot
            .iter_mut()
            .filter(|n| n.is_word())
            .zip(breaks.iter().copied())
        {
            word.remove_attribute(ATTR_SENT_BREAK);
            if is_break {
                word.set_attribute(ATTR_SENT_BREAK, "1");
            }
        }

        breaks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::{PeriodAndCapitalPolicy, PeriodPolicy};
    use crate::tree::MarkerKind;

    fn flat_document(tokens: &[&str]) -> Node {
        let mut doc = Node::document();
        for token in tokens {
            let node = match *token {
                "<pb>" => Node::marker(MarkerKind::PageBreak),
                "<fn>" => Node::marker(MarkerKind::Footnote),
                text => Node::word(text),
            };
            doc.append(node).unwrap();
        }
        doc
    }

    fn sentence_texts(doc: &Node) -> Vec<Vec<&str>> {
        doc.sentences()
            .map(|s| s.texts_of(NodeKind::Word))
            .collect()
    }

    #[test]
    fn test_two_sentences_on_period() {
        let mut doc = flat_document(&["a", ".", "b", "c", "."]);
        let count = Segmenter::new(PeriodPolicy).segment(&mut doc).unwrap();

        assert_eq!(count, 2);
        assert_eq!(
            sentence_texts(&doc),
            vec![vec!["a", "."], vec!["b", "c", "."]]
        );
    }

    #[test]
    fn test_last_word_forces_break() {
        let mut doc = flat_document(&["a", "b"]);
        let count = Segmenter::new(PeriodPolicy).segment(&mut doc).unwrap();

        assert_eq!(count, 1);
        assert_eq!(sentence_texts(&doc), vec![vec!["a", "b"]]);
        assert_eq!(doc.children().len(), 1);
    }

    #[test]
    fn test_leading_marker_attaches_to_root() {
        let mut doc = flat_document(&["<pb>", "a", "."]);
        Segmenter::new(PeriodPolicy).segment(&mut doc).unwrap();

        let tags: Vec<_> = doc.children().iter().map(Node::tag).collect();
        assert_eq!(tags, vec!["newpage", "s"]);
    }

    #[test]
    fn test_marker_inside_open_sentence() {
        let mut doc = flat_document(&["a", "<fn>", "b", ".", "<pb>", "c"]);
        Segmenter::new(PeriodPolicy).segment(&mut doc).unwrap();

        let top: Vec<_> = doc.children().iter().map(Node::tag).collect();
        assert_eq!(top, vec!["s", "newpage", "s"]);

        let first: Vec<_> = doc.children()[0].children().iter().map(Node::tag).collect();
        assert_eq!(first, vec!["w", "footnote", "w", "w"]);
    }

    #[test]
    fn test_no_words_leaves_document_unchanged() {
        let mut doc = flat_document(&["<pb>", "<fn>"]);
        let before = doc.clone();
        let count = Segmenter::new(PeriodPolicy).segment(&mut doc).unwrap();

        assert_eq!(count, 0);
        assert_eq!(doc, before);
    }

    #[test]
    fn test_sent_break_does_not_leak() {
        let mut doc = flat_document(&["a", ".", "b"]);
        Segmenter::new(PeriodPolicy).segment(&mut doc).unwrap();

        assert!(doc.words().all(|w| !w.has_attribute(ATTR_SENT_BREAK)));
    }

    #[test]
    fn test_incoming_sent_break_is_ignored() {
        let mut doc = Node::document();
        doc.append(Node::word("a").with_attribute(ATTR_SENT_BREAK, "0"))
            .unwrap();
        doc.append(Node::word("b")).unwrap();
        doc.append(Node::word(".")).unwrap();

        let sentences = Segmenter::new(PeriodPolicy).segment(&mut doc).unwrap();
        assert_eq!(sentences, 1);
        assert_eq!(sentence_texts(&doc), vec![vec!["a", "b", "."]]);
        assert!(doc.words().all(|w| !w.has_attribute(ATTR_SENT_BREAK)));
    }

    #[test]
    fn test_segmenting_twice_is_rejected() {
        let mut doc = flat_document(&["a", ".", "b", "."]);
        let segmenter = Segmenter::new(PeriodPolicy);
        segmenter.segment(&mut doc).unwrap();
        let once = doc.clone();

        assert!(matches!(
            segmenter.segment(&mut doc),
            Err(CorpusError::AlreadySegmented)
        ));
        assert_eq!(doc, once);
        assert!(doc.sentences().all(|s| s.sentences().next().is_none()));
    }

    #[test]
    fn test_period_and_capital_model() {
        let mut doc = flat_document(&["He", "rode.", "The", "ij.", "knyghtes", "came"]);
        let count = Segmenter::new(PeriodAndCapitalPolicy)
            .segment(&mut doc)
            .unwrap();

        assert_eq!(count, 2);
        assert_eq!(
            sentence_texts(&doc),
            vec![vec!["He", "rode."], vec!["The", "ij.", "knyghtes", "came"]]
        );
    }

    #[test]
    fn test_segment_word_is_rejected() {
        let mut word = Node::word("a");
        assert!(matches!(
            Segmenter::new(PeriodPolicy).segment(&mut word),
            Err(CorpusError::LeafNode)
        ));
    }
}
