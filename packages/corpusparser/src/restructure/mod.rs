//! Parse restructuring.
//!
//! A sentence arrives as a flat run of words and markers. Given a
//! constituency parse in bracket notation such as
//! `(S (NP (DT The) (NN dog)) (VP (VBZ runs)))`, the [`Restructurer`]
//! rebuilds it into nested phrase nodes (`type` = category), tags each
//! word with its `pos`, and keeps every marker next to the word it
//! trailed. The original word nodes are moved, never recreated.

mod engine;
mod parser;
mod token;

pub use engine::{MismatchPolicy, RestructureOutcome, Restructurer};
pub use parser::{CommandParser, ConstituencyParser, LookupParser, ParserHandle};
pub use token::{count_terminals, tokenize, ParseToken};
