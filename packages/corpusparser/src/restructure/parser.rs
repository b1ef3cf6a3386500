//! Constituency parser collaborators.
//!
//! The restructurer never runs an NLP toolchain itself. A caller builds a
//! [`ParserHandle`] once and passes it to every parsing call.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::config::DEFAULT_MAX_PARSE_WORDS;
use crate::error::{CorpusError, Result};

/// Something that turns sentence text into a bracket-notation parse.
///
/// `None` means the sentence could not be parsed.
pub trait ConstituencyParser {
    fn parse(&self, text: &str) -> Option<String>;
}

impl<F> ConstituencyParser for F
where
    F: Fn(&str) -> Option<String>,
{
    fn parse(&self, text: &str) -> Option<String> {
        self(text)
    }
}

/// Parser plus the limits that apply to every call.
pub struct ParserHandle {
    parser: Box<dyn ConstituencyParser>,
    max_words: Option<usize>,
}

impl ParserHandle {
    /// Wrap a parser with the default sentence length bound.
    pub fn new(parser: impl ConstituencyParser + 'static) -> Self {
        Self {
            parser: Box::new(parser),
            max_words: Some(DEFAULT_MAX_PARSE_WORDS),
        }
    }

    /// Set the longest sentence (in words) sent to the parser.
    #[must_use]
    pub fn with_max_words(mut self, max_words: Option<usize>) -> Self {
        self.max_words = max_words;
        self
    }

    #[must_use]
    pub fn max_words(&self) -> Option<usize> {
        self.max_words
    }

    /// Parse a sentence given as its word texts.
    ///
    /// Sentences longer than the bound, empty sentences and blank parser
    /// output all yield `None`.
    pub fn parse_words(&self, words: &[&str]) -> Option<String> {
        if words.is_empty() {
            return None;
        }
        if let Some(max) = self.max_words {
            if words.len() > max {
                tracing::debug!(words = words.len(), max, "Sentence too long to parse");
                return None;
            }
        }

        let text = words.join(" ");
        self.parser
            .parse(&text)
            .map(|parse| parse.trim().to_string())
            .filter(|parse| !parse.is_empty())
    }
}

impl std::fmt::Debug for ParserHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserHandle")
            .field("max_words", &self.max_words)
            .finish_non_exhaustive()
    }
}

/// Parses by table lookup of the exact sentence text.
#[derive(Debug, Clone, Default)]
pub struct LookupParser {
    parses: HashMap<String, String>,
}

impl LookupParser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, sentence: impl Into<String>, parse: impl Into<String>) {
        self.parses.insert(sentence.into(), parse.into());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.parses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parses.is_empty()
    }

    /// Build from a JSON object mapping sentence text to parse string.
    ///
    /// ```json
    /// { "The dog runs": "(S (NP (DT The) (NN dog)) (VP (VBZ runs)))" }
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let parses: HashMap<String, String> = serde_json::from_str(json)?;
        Ok(Self { parses })
    }

    /// Load a JSON parse table.
    pub fn load(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading parse table");
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

impl ConstituencyParser for LookupParser {
    fn parse(&self, text: &str) -> Option<String> {
        self.parses.get(text).cloned()
    }
}

/// Runs an external command per sentence: text on stdin, parse on stdout.
#[derive(Debug, Clone)]
pub struct CommandParser {
    program: String,
    args: Vec<String>,
}

impl CommandParser {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Build from a whitespace-separated command line such as
    /// `"python3 parse.py --model en"`.
    ///
    /// # Errors
    /// Returns `Parser` if the command line is blank.
    pub fn from_command_line(command_line: &str) -> Result<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| CorpusError::Parser("empty parser command".to_string()))?;
        Ok(Self::new(program, parts.collect()))
    }

    fn run(&self, text: &str) -> Result<Option<String>> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| CorpusError::Parser(format!("{}: {e}", self.program)))?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = writeln!(stdin, "{text}") {
                // Close the pipe and reap the child before reporting.
                drop(stdin);
                if let Err(wait_err) = child.wait() {
                    tracing::warn!(program = %self.program, error = %wait_err, "Failed to reap parser command");
                }
                return Err(e.into());
            }
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            tracing::warn!(
                program = %self.program,
                status = %output.status,
                "Parser command failed"
            );
            return Ok(None);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let parse = stdout.trim();
        Ok((!parse.is_empty()).then(|| parse.to_string()))
    }
}

impl ConstituencyParser for CommandParser {
    fn parse(&self, text: &str) -> Option<String> {
        match self.run(text) {
            Ok(parse) => parse,
            Err(e) => {
                tracing::warn!(error = %e, "Could not run parser command");
                None
            }
        }
    }
}
