//! Rebuilds a flat sentence into a phrase tree from a bracket-notation parse.

use std::collections::VecDeque;

use serde::Deserialize;

use super::token::{tokenize, ParseToken};
use crate::config::ATTR_POS;
use crate::error::{CorpusError, Result};
use crate::tree::{Node, NodeKind};

/// How to handle a parse whose terminals do not line up with the words.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchPolicy {
    /// Skip surplus terminals and append unconsumed children to the
    /// sentence root, in order.
    #[default]
    Lenient,
    /// Refuse the parse before touching the sentence.
    FailFast,
}

/// Result of restructuring one sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestructureOutcome {
    /// Every terminal consumed exactly one word.
    Restructured,
    /// Terminal and word counts differed; the tree was built leniently.
    Mismatched { terminals: usize, words: usize },
    /// The parse holds no terminals; the sentence is untouched.
    Unparseable,
}

/// Path of child indices from the sentence root to an open container.
type Path = Vec<usize>;

/// Engine for turning a sentence's flat children into nested phrases.
#[derive(Debug, Clone, Copy, Default)]
pub struct Restructurer {
    mismatch_policy: MismatchPolicy,
}

impl Restructurer {
    #[must_use]
    pub fn new(mismatch_policy: MismatchPolicy) -> Self {
        Self { mismatch_policy }
    }

    #[must_use]
    pub fn mismatch_policy(&self) -> MismatchPolicy {
        self.mismatch_policy
    }

    /// Restructure `sentence` according to `parse`.
    ///
    /// Words are reattached in order, one per terminal, and tagged with the
    /// part-of-speech label that governs them. Markers follow the word they
    /// trailed in the original order and never receive a `pos`.
    ///
    /// Terminals consume words only. Markers that open the sentence are
    /// attached to the container of the first terminal, ahead of its word,
    /// without using up that terminal.
    ///
    /// # Arguments
    /// * `sentence` - A sentence whose children are words and markers
    /// * `parse` - Constituency parse in bracket notation
    ///
    /// # Returns
    /// `Restructured`, `Mismatched` when lenient handling was needed, or
    /// `Unparseable` when the parse has no terminals.
    ///
    /// # Errors
    /// * `AlreadyRestructured` if the sentence already holds phrases
    /// * `StructuralMismatch` under `FailFast` when counts differ; the
    ///   sentence is left intact
    /// * `LeafNode` if `sentence` is a word
    ///
    /// # Examples
    /// ```
    /// use corpusparser::restructure::{RestructureOutcome, Restructurer};
    /// use corpusparser::tree::Node;
    ///
    /// let mut sentence = Node::sentence();
    /// sentence.append(Node::word("Go")).unwrap();
    ///
    /// let outcome = Restructurer::default()
    ///     .restructure(&mut sentence, "(S (VP (VB Go)))")
    ///     .unwrap();
    /// assert_eq!(outcome, RestructureOutcome::Restructured);
    /// assert_eq!(sentence.words().next().unwrap().attribute("pos"), Some("VB"));
    /// ```
    pub fn restructure(&self, sentence: &mut Node, parse: &str) -> Result<RestructureOutcome> {
        if sentence.is_word() {
            return Err(CorpusError::LeafNode);
        }
        if sentence.descendants_of(NodeKind::Phrase).next().is_some() {
            return Err(CorpusError::AlreadyRestructured);
        }

        let tokens = tokenize(parse);
        let terminals = tokens.iter().filter(|t| t.is_terminal()).count();
        let words = sentence.children().iter().filter(|n| n.is_word()).count();

        if terminals == 0 {
            tracing::debug!(parse, "Parse has no terminals");
            return Ok(RestructureOutcome::Unparseable);
        }
        if terminals != words && self.mismatch_policy == MismatchPolicy::FailFast {
            return Err(CorpusError::StructuralMismatch { terminals, words });
        }

        let mut queue: VecDeque<Node> = sentence.take_children().into();
        let mut stack: Vec<Path> = vec![Path::new()];
        let mut pos: Option<&str> = None;
        let mut skipped = 0usize;

        for token in &tokens {
            match *token {
                ParseToken::PhraseOpen(category) => {
                    let top_path = top(&stack).clone();
                    let container = node_at_mut(sentence, &top_path)?;
                    container.append(Node::phrase(category))?;

                    let mut path = top_path;
                    path.push(container.children().len() - 1);
                    stack.push(path);
                }
                ParseToken::PosOpen(label) => pos = Some(label),
                ParseToken::Terminal { text, closers } => {
                    let container = node_at_mut(sentence, top(&stack))?;

                    // Markers that open the sentence precede its first word.
                    drain_markers(&mut queue, container)?;

                    match queue.pop_front() {
                        Some(mut word) => {
                            if let Some(label) = pos {
                                word.set_attribute(ATTR_POS, label);
                            }
                            container.append(word)?;
                            drain_markers(&mut queue, container)?;
                        }
                        None => {
                            tracing::debug!(terminal = text, "No word left for terminal");
                            skipped += 1;
                        }
                    }

                    for _ in 1..closers {
                        if stack.len() > 1 {
                            stack.pop();
                        }
                    }
                }
                ParseToken::Other(text) => {
                    tracing::trace!(token = text, "Ignoring unrecognised parse token");
                }
            }
        }

        let leftover = queue.iter().filter(|n| n.is_word()).count();
        for node in queue {
            sentence.append(node)?;
        }

        if skipped == 0 && leftover == 0 {
            Ok(RestructureOutcome::Restructured)
        } else {
            tracing::warn!(
                terminals,
                words,
                skipped_terminals = skipped,
                unconsumed_words = leftover,
                "Parse does not match sentence words"
            );
            Ok(RestructureOutcome::Mismatched { terminals, words })
        }
    }
}

fn top(stack: &[Path]) -> &Path {
    // The root path is never popped.
    &stack[stack.len() - 1]
}

fn node_at_mut<'a>(root: &'a mut Node, path: &[usize]) -> Result<&'a mut Node> {
    let mut node = root;
    for &index in path {
        node = node.child_mut(index)?;
    }
    Ok(node)
}

fn drain_markers(queue: &mut VecDeque<Node>, container: &mut Node) -> Result<()> {
    while queue.front().is_some_and(|n| !n.is_word()) {
        if let Some(marker) = queue.pop_front() {
            container.append(marker)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ATTR_TYPE;
    use crate::tree::MarkerKind;
    use pretty_assertions::assert_eq;

    const DOG_RUNS: &str = "(S (NP (DT The) (NN dog)) (VP (VBZ runs)))";

    fn sentence(tokens: &[&str]) -> Node {
        let mut s = Node::sentence();
        for token in tokens {
            let node = match *token {
                "#page" => Node::marker(MarkerKind::PageBreak),
                "#note" => Node::with_text(NodeKind::Marker(MarkerKind::Comment), "note"),
                text => Node::word(text),
            };
            s.append(node).unwrap();
        }
        s
    }

    fn word(text: &str, pos: &str) -> Node {
        Node::word(text).with_attribute(ATTR_POS, pos)
    }

    #[test]
    fn test_restructure_example() {
        let mut s = sentence(&["The", "dog", "runs"]);
        let outcome = Restructurer::default().restructure(&mut s, DOG_RUNS).unwrap();
        assert_eq!(outcome, RestructureOutcome::Restructured);

        let mut np = Node::phrase("NP");
        np.append(word("The", "DT")).unwrap();
        np.append(word("dog", "NN")).unwrap();
        let mut vp = Node::phrase("VP");
        vp.append(word("runs", "VBZ")).unwrap();
        let mut root = Node::phrase("S");
        root.append(np).unwrap();
        root.append(vp).unwrap();
        let mut expected = Node::sentence();
        expected.append(root).unwrap();

        assert_eq!(s, expected);
    }

    #[test]
    fn test_phrase_type_attribute() {
        let mut s = sentence(&["The", "dog", "runs"]);
        Restructurer::default().restructure(&mut s, DOG_RUNS).unwrap();

        let types: Vec<&str> = s
            .descendants_of(NodeKind::Phrase)
            .filter_map(|p| p.attribute(ATTR_TYPE))
            .collect();
        assert_eq!(types, vec!["S", "NP", "VP"]);
    }

    #[test]
    fn test_marker_follows_its_word() {
        let mut s = sentence(&["The", "dog", "#page", "runs"]);
        Restructurer::default().restructure(&mut s, DOG_RUNS).unwrap();

        let np = s.child(0).unwrap().child(0).unwrap();
        assert_eq!(np.children().len(), 3);
        assert_eq!(np.child(1).unwrap().text(), Some("dog"));
        assert_eq!(np.child(2).unwrap().kind(), NodeKind::Marker(MarkerKind::PageBreak));
        assert!(!np.child(2).unwrap().has_attribute(ATTR_POS));
    }

    #[test]
    fn test_leading_marker_precedes_first_word() {
        let mut s = sentence(&["#note", "The", "dog", "runs"]);
        let outcome = Restructurer::default().restructure(&mut s, DOG_RUNS).unwrap();
        assert_eq!(outcome, RestructureOutcome::Restructured);

        let np = s.child(0).unwrap().child(0).unwrap();
        assert_eq!(np.child(0).unwrap().text(), Some("note"));
        assert_eq!(np.child(1).unwrap().attribute(ATTR_POS), Some("DT"));
        assert_eq!(s.count_of(NodeKind::Word), 3);
    }

    #[test]
    fn test_surplus_terminals_are_skipped() {
        let mut s = sentence(&["The", "dog"]);
        let outcome = Restructurer::default().restructure(&mut s, DOG_RUNS).unwrap();

        assert_eq!(outcome, RestructureOutcome::Mismatched { terminals: 3, words: 2 });
        assert_eq!(s.texts_of(NodeKind::Word), vec!["The", "dog"]);
        let vp = s.child(0).unwrap().child(1).unwrap();
        assert!(vp.children().is_empty());
    }

    #[test]
    fn test_unconsumed_words_are_kept_in_order() {
        let mut s = sentence(&["The", "dog", "runs", "#page", "fast"]);
        let outcome = Restructurer::default().restructure(&mut s, DOG_RUNS).unwrap();

        assert_eq!(outcome, RestructureOutcome::Mismatched { terminals: 3, words: 4 });
        assert_eq!(s.texts_of(NodeKind::Word), vec!["The", "dog", "runs", "fast"]);
        // The marker trails "runs"; only the last word is left over.
        let last = &s.children()[s.children().len() - 1];
        assert_eq!(last.text(), Some("fast"));
        assert_eq!(s.count_of(NodeKind::Marker(MarkerKind::PageBreak)), 1);
    }

    #[test]
    fn test_fail_fast_leaves_sentence_intact() {
        let mut s = sentence(&["The", "dog"]);
        let before = s.clone();
        let err = Restructurer::new(MismatchPolicy::FailFast)
            .restructure(&mut s, DOG_RUNS)
            .unwrap_err();

        assert!(matches!(
            err,
            CorpusError::StructuralMismatch { terminals: 3, words: 2 }
        ));
        assert_eq!(s, before);
    }

    #[test]
    fn test_fail_fast_accepts_matching_parse() {
        let mut s = sentence(&["The", "dog", "runs"]);
        let outcome = Restructurer::new(MismatchPolicy::FailFast)
            .restructure(&mut s, DOG_RUNS)
            .unwrap();
        assert_eq!(outcome, RestructureOutcome::Restructured);
    }

    #[test]
    fn test_restructure_twice_is_rejected() {
        let mut s = sentence(&["The", "dog", "runs"]);
        let restructurer = Restructurer::default();
        restructurer.restructure(&mut s, DOG_RUNS).unwrap();
        let once = s.clone();

        assert!(matches!(
            restructurer.restructure(&mut s, DOG_RUNS),
            Err(CorpusError::AlreadyRestructured)
        ));
        assert_eq!(s, once);
    }

    #[test]
    fn test_unbalanced_closers_never_pop_the_sentence() {
        let mut s = sentence(&["Go", "home"]);
        let outcome = Restructurer::default()
            .restructure(&mut s, "(S (VB Go))))))) (NP (NN home)))")
            .unwrap();

        assert_eq!(outcome, RestructureOutcome::Restructured);
        assert_eq!(s.children().len(), 2);
        assert_eq!(s.child(1).unwrap().attribute(ATTR_TYPE), Some("NP"));
    }

    #[test]
    fn test_parse_without_terminals_is_unparseable() {
        for parse in ["", "(ROOT", "SENTENCE_SKIPPED"] {
            let mut s = sentence(&["The", "#page", "dog"]);
            let outcome = Restructurer::default().restructure(&mut s, parse).unwrap();

            assert_eq!(outcome, RestructureOutcome::Unparseable);
            assert_eq!(s, sentence(&["The", "#page", "dog"]));
        }

        let mut s = sentence(&["The", "dog"]);
        let outcome = Restructurer::new(MismatchPolicy::FailFast)
            .restructure(&mut s, "")
            .unwrap();
        assert_eq!(outcome, RestructureOutcome::Unparseable);
    }

    #[test]
    fn test_terminal_without_pos_label() {
        let mut s = sentence(&["hello"]);
        Restructurer::default().restructure(&mut s, "hello)").unwrap();
        let word = s.child(0).unwrap();
        assert_eq!(word.text(), Some("hello"));
        assert!(!word.has_attribute(ATTR_POS));
    }

    #[test]
    fn test_mismatch_policy_deserialize() {
        let policy: MismatchPolicy = serde_yaml_ng::from_str("fail_fast").unwrap();
        assert_eq!(policy, MismatchPolicy::FailFast);
    }
}
