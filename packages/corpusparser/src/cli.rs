//! Command-line interface for corpusparser.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use textwrap::{fill, Options};

use crate::config::{PipelineConfig, DEFAULT_CONCORDANCE_WINDOW, TEXT_WRAP_WIDTH};
use crate::corpus::Corpus;
use crate::document::{Document, ParseReport};
use crate::error::{CorpusError, Result};
use crate::restructure::{CommandParser, LookupParser, MismatchPolicy, ParserHandle};
use crate::stats::{DocumentInfo, TextForm};
use crate::xml::{import_colmep_file, read_document_file, write_tree_file, WriteOptions};

/// corpusparser - Segment, normalize and parse historical English texts.
#[derive(Parser)]
#[command(name = "corpusparser")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import documents, run the pipeline and write XML.
    Process {
        /// Input files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        #[command(flatten)]
        pipeline: PipelineArgs,

        /// Output directory (default: current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Document identifier (e.g., CAXTON-FSOA); single input only
        #[arg(long)]
        id: Option<String>,

        /// JSON table of sentence text to parse string
        #[arg(long, conflicts_with = "parser_cmd")]
        parses: Option<PathBuf>,

        /// Command that reads a sentence on stdin and prints its parse
        #[arg(long)]
        parser_cmd: Option<String>,

        /// Longest sentence (in words) sent to the parser
        #[arg(long)]
        max_parse_words: Option<usize>,

        /// Leave sentences whose parse does not match their words untouched
        #[arg(long)]
        fail_fast: bool,
    },

    /// Print the sentences of a document.
    Sentences {
        /// Input file
        input: PathBuf,

        #[command(flatten)]
        pipeline: PipelineArgs,

        /// Print original spellings instead of corrected text
        #[arg(long)]
        original: bool,

        /// Wrap width
        #[arg(short, long, default_value_t = TEXT_WRAP_WIDTH)]
        width: usize,
    },

    /// Print corpus statistics and word frequencies.
    Stats {
        /// Input files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        #[command(flatten)]
        pipeline: PipelineArgs,

        /// Number of most frequent words to list
        #[arg(short, long, default_value_t = 10)]
        top: usize,

        /// Only count words starting with this prefix
        #[arg(long)]
        starts_with: Option<String>,

        /// Print keyword-in-context lines for this word
        #[arg(long)]
        concordance: Option<String>,

        /// Context words on each side of a concordance keyword
        #[arg(long, default_value_t = DEFAULT_CONCORDANCE_WINDOW)]
        window: usize,

        /// Count original spellings instead of corrected text
        #[arg(long)]
        original: bool,
    },
}

/// Input file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// COLMEP transcription
    Colmep,
    /// XML written by `corpusparser process`
    Xml,
}

/// Options shared by every command that runs the pipeline.
#[derive(Debug, Args)]
pub struct PipelineArgs {
    /// Pipeline configuration file (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Input format
    #[arg(short, long, value_enum, default_value_t = InputFormat::Colmep)]
    pub format: InputFormat,

    /// Sentence tokenisation model (period, period_and_capital)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Built-in spelling rule set to apply; may be repeated
    #[arg(long = "rule-set")]
    pub rule_sets: Vec<String>,

    /// JSON spellings file
    #[arg(long)]
    pub spellings: Option<PathBuf>,
}

impl PipelineArgs {
    /// Load the configuration file, if any, and apply flag overrides.
    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::load(path)?,
            None => PipelineConfig::default(),
        };
        if let Some(model) = &self.model {
            config.tokenisation_model.clone_from(model);
        }
        config.rule_sets.extend(self.rule_sets.iter().cloned());
        if let Some(path) = &self.spellings {
            config.spellings_file = Some(path.clone());
        }
        Ok(config)
    }
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            inputs,
            pipeline,
            output,
            id,
            parses,
            parser_cmd,
            max_parse_words,
            fail_fast,
        } => {
            let mut config = pipeline.pipeline_config()?;
            if max_parse_words.is_some() {
                config.max_parse_words = max_parse_words;
            }
            if fail_fast {
                config.mismatch_policy = MismatchPolicy::FailFast;
            }
            let parser = parser_handle(parses.as_deref(), parser_cmd.as_deref(), &config)?;
            process_command(
                &inputs,
                pipeline.format,
                &config,
                output.as_deref(),
                id.as_deref(),
                parser.as_ref(),
            )
        }
        Commands::Sentences {
            input,
            pipeline,
            original,
            width,
        } => sentences_command(&input, &pipeline, original, width),
        Commands::Stats {
            inputs,
            pipeline,
            top,
            starts_with,
            concordance,
            window,
            original,
        } => {
            let form = if original {
                TextForm::Original
            } else {
                TextForm::Corrected
            };
            stats_command(
                &inputs,
                &pipeline,
                top,
                starts_with.as_deref(),
                concordance.as_deref(),
                window,
                form,
            )
        }
    }
}

/// Build the parser selected on the command line, if any.
fn parser_handle(
    parses: Option<&Path>,
    parser_cmd: Option<&str>,
    config: &PipelineConfig,
) -> Result<Option<ParserHandle>> {
    let handle = match (parses, parser_cmd) {
        (Some(path), _) => ParserHandle::new(LookupParser::load(path)?),
        (None, Some(command_line)) => ParserHandle::new(CommandParser::from_command_line(command_line)?),
        (None, None) => return Ok(None),
    };
    Ok(Some(handle.with_max_words(config.max_parse_words)))
}

/// Import a document in the given format, named after its file stem.
fn load_document(path: &Path, format: InputFormat) -> Result<Document> {
    match format {
        InputFormat::Colmep => import_colmep_file(path, &file_stem(path)),
        InputFormat::Xml => read_document_file(path),
    }
}

/// Run the pipeline unless the document was segmented by an earlier run.
fn prepare_document(document: &mut Document, config: &PipelineConfig) -> Result<()> {
    if document.sentence_count() == 0 {
        document.run(config)?;
    }
    Ok(())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}

/// Execute the process command.
fn process_command(
    inputs: &[PathBuf],
    format: InputFormat,
    config: &PipelineConfig,
    output: Option<&Path>,
    id: Option<&str>,
    parser: Option<&ParserHandle>,
) -> Result<()> {
    let output_dir = output.unwrap_or_else(|| Path::new("."));
    if !output_dir.is_dir() {
        return Err(CorpusError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Output directory does not exist: {}", output_dir.display()),
        )));
    }
    if id.is_some() && inputs.len() > 1 {
        return Err(CorpusError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "--id can only be used with a single input",
        )));
    }

    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let mut total = ParseReport::default();

    for input in inputs {
        pb.set_message(format!("Processing {}...", input.display()));

        let result = process_one(input, format, config, output_dir, id, parser);
        let (document, path, report) = match result {
            Ok(processed) => processed,
            Err(e) => {
                pb.finish_and_clear();
                return Err(e);
            }
        };

        pb.suspend(|| {
            println!(
                "{} {} ({} sentences, {} words)",
                style("Processed").bold(),
                style(document.name().unwrap_or_default()).cyan(),
                document.sentence_count(),
                document.word_count()
            );
            if let Some(report) = &report {
                print_parse_report(report);
            }
            println!("  {} {}", style("Saved to:").green(), path.display());
        });

        if let Some(report) = &report {
            total.merge(report);
        }
    }

    pb.finish_and_clear();

    if parser.is_some() && inputs.len() > 1 {
        println!();
        println!("{}", style("All documents").bold());
        print_parse_report(&total);
    }

    Ok(())
}

fn process_one(
    input: &Path,
    format: InputFormat,
    config: &PipelineConfig,
    output_dir: &Path,
    id: Option<&str>,
    parser: Option<&ParserHandle>,
) -> Result<(Document, PathBuf, Option<ParseReport>)> {
    let mut document = load_document(input, format)?;
    if let Some(id) = id {
        document.set_id(id)?;
    }
    prepare_document(&mut document, config)?;

    let report = parser.map(|p| document.parse_sentences(p, &config.parse_options()));

    let path = output_dir.join(format!("{}.corpus.xml", file_stem(input)));
    write_tree_file(&path, document.root(), &WriteOptions::pretty())?;

    Ok((document, path, report))
}

fn print_parse_report(report: &ParseReport) {
    println!(
        "  Parsed: {}  Restructured: {}",
        style(report.parsed).green(),
        style(report.restructured).green()
    );
    if report.unparseable > 0 || report.mismatched > 0 || report.skipped > 0 {
        println!(
            "  Unparseable: {}  Mismatched: {}  Skipped: {}",
            style(report.unparseable).yellow().bold(),
            style(report.mismatched).yellow().bold(),
            style(report.skipped).yellow()
        );
    }
}

/// Execute the sentences command.
fn sentences_command(input: &Path, pipeline: &PipelineArgs, original: bool, width: usize) -> Result<()> {
    let config = pipeline.pipeline_config()?;
    let mut document = load_document(input, pipeline.format)?;
    prepare_document(&mut document, &config)?;

    let texts = if original {
        document.original_sentence_texts()
    } else {
        document.sentence_texts()
    };

    for (i, text) in texts.iter().enumerate() {
        println!("{}", wrap_sentence(i + 1, text, width));
    }

    Ok(())
}

/// Number and wrap a sentence, indenting continuation lines under the text.
fn wrap_sentence(number: usize, text: &str, width: usize) -> String {
    let label = format!("{number:>5}  ");
    let indent = " ".repeat(label.len());
    let options = Options::new(width.max(label.len() + 1))
        .initial_indent(&label)
        .subsequent_indent(&indent);
    fill(text, options)
}

/// Execute the stats command.
fn stats_command(
    inputs: &[PathBuf],
    pipeline: &PipelineArgs,
    top: usize,
    starts_with: Option<&str>,
    concordance: Option<&str>,
    window: usize,
    form: TextForm,
) -> Result<()> {
    let config = pipeline.pipeline_config()?;
    let mut corpus = Corpus::new();
    for input in inputs {
        let mut document = load_document(input, pipeline.format)?;
        prepare_document(&mut document, &config)?;
        corpus.add_document(document);
    }

    for document in corpus.documents() {
        println!("{}", style(document.name().unwrap_or("document")).bold());
        let info = DocumentInfo::from_node(document.root()).to_string();
        for line in info.lines().filter(|l| !l.starts_with("Name:")) {
            println!("  {line}");
        }
        println!();
    }

    if corpus.len() > 1 {
        println!("{}", style("Corpus").bold());
        println!("  Documents: {}", corpus.len());
        for line in corpus.info().to_string().lines() {
            println!("  {line}");
        }
        println!();
    }

    let frequency = match starts_with {
        Some(prefix) => corpus.word_frequency_starts_with(prefix, form),
        None => corpus.word_frequency(form),
    };
    println!("{}", style("Most frequent words").bold());
    for (word, count) in frequency.most_common(top) {
        println!("  {count:>6}  {word}");
    }

    if let Some(keyword) = concordance {
        println!();
        println!("{} {}", style("Concordance").bold(), style(keyword).cyan());
        for (name, line) in corpus.concordance(keyword, window, form) {
            println!("  {}  {line}", name.unwrap_or_default());
        }
    }

    Ok(())
}
