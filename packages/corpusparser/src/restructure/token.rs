//! Classification of whitespace-separated bracket-notation tokens.

/// One token of a constituency parse string, classified by its lookahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseToken<'a> {
    /// `(CAT` followed by another opener: a phrase node.
    PhraseOpen(&'a str),
    /// `(TAG` followed by a terminal: the part-of-speech of the next word.
    PosOpen(&'a str),
    /// A leaf such as `dog))`; `closers` counts the trailing parentheses.
    Terminal { text: &'a str, closers: usize },
    /// Anything else; ignored by the restructurer.
    Other(&'a str),
}

impl ParseToken<'_> {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal { .. })
    }
}

/// Split a parse string on whitespace and classify each token.
///
/// # Examples
/// ```
/// use corpusparser::restructure::{tokenize, ParseToken};
///
/// let tokens = tokenize("(S (VP (VB Go)))");
/// assert_eq!(tokens[0], ParseToken::PhraseOpen("S"));
/// assert_eq!(tokens[2], ParseToken::PosOpen("VB"));
/// assert_eq!(tokens[3], ParseToken::Terminal { text: "Go", closers: 3 });
/// ```
#[must_use]
pub fn tokenize(parse: &str) -> Vec<ParseToken<'_>> {
    let raw: Vec<&str> = parse.split_whitespace().collect();

    raw.iter()
        .enumerate()
        .map(|(i, token)| {
            if let Some(category) = token.strip_prefix('(') {
                let next_opens = raw.get(i + 1).is_some_and(|next| next.starts_with('('));
                if next_opens {
                    ParseToken::PhraseOpen(category)
                } else {
                    ParseToken::PosOpen(category)
                }
            } else if token.ends_with(')') {
                let text = token.trim_end_matches(')');
                ParseToken::Terminal {
                    text,
                    closers: token.len() - text.len(),
                }
            } else {
                ParseToken::Other(token)
            }
        })
        .collect()
}

/// Count the terminal tokens of a parse string.
#[must_use]
pub fn count_terminals(parse: &str) -> usize {
    tokenize(parse).iter().filter(|t| t.is_terminal()).count()
}
