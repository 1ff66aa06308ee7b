//! parser for TMSH configuration text

use std::path::Path;
use tracing::{debug, trace};

use crate::error::ParseError;
use crate::language::{Document, LoadingError, Value};

mod braces;
mod errors;
mod lines;
mod nodes;
mod scalar;
mod scanner;

pub use errors::ParsingError;
pub use lines::LineIndex;
pub use nodes::{CommandRecord, Escape, Node, NodeKind, Span};
pub use scalar::classify_scalar;
pub use scanner::{extract_commands, scan};

/// Key phrases whose bodies are scripts rather than configuration.
pub const DEFAULT_BLACKLIST: [&str; 6] = [
    "ltm rule",
    "gtm rule",
    "cli script",
    "sys application",
    "rule",
    "sys icall",
];

/// Settings which change how configuration text is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Commands whose key phrase starts with one of these are kept as raw
    /// text, braces included, and not parsed further.
    pub blacklist: Vec<String>,
    /// How deeply blocks may nest within a body.
    pub max_nesting: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            blacklist: DEFAULT_BLACKLIST
                .iter()
                .map(|prefix| prefix.to_string())
                .collect(),
            max_nesting: 512,
        }
    }
}

impl ParserConfig {
    fn is_opaque(&self, key: &str) -> bool {
        self.blacklist
            .iter()
            .any(|prefix| key.starts_with(prefix.as_str()))
    }
}

/// Read a file and return an owned String. We pass that ownership back to the
/// main function so that the Document created by parse() below can be
/// reported against the same text.
pub fn load(filename: &Path) -> Result<String, LoadingError<'_>> {
    match std::fs::read_to_string(filename) {
        Ok(content) => Ok(content),
        Err(error) => {
            debug!(?error);
            match error.kind() {
                std::io::ErrorKind::NotFound => Err(LoadingError {
                    problem: "File not found".to_string(),
                    details: String::new(),
                    filename,
                }),
                _ => Err(LoadingError {
                    problem: "Failed reading".to_string(),
                    details: error
                        .kind()
                        .to_string(),
                    filename,
                }),
            }
        }
    }
}

/// Parse configuration text into a Document using the default settings.
pub fn parse(content: &str) -> Result<Document, ParseError> {
    parse_with(content, &ParserConfig::default())
}

/// Parse configuration text into a Document. Each top-level `key { body }`
/// command becomes one entry, in source order.
pub fn parse_with(content: &str, config: &ParserConfig) -> Result<Document, ParseError> {
    let index = LineIndex::new(content);

    let script = scan(content).map_err(|problem| ParseError::new(problem, &index))?;
    let records = extract_commands(content, &script);

    debug!(
        "Found {} command{}",
        records.len(),
        if records.len() == 1 { "" } else { "s" }
    );

    let mut document = Document::new();

    for record in records {
        trace!(key = %record.key_phrase, "command");

        let value = if config.is_opaque(&record.key_phrase) {
            debug!(key = %record.key_phrase, "Keeping body as raw text");
            Value::Raw(
                record
                    .body(content)
                    .to_string(),
            )
        } else {
            let body = braces::parse_body(content, record.body_span, config.max_nesting)
                .map_err(|problem| ParseError::new(problem, &index))?;
            Value::Dict(body)
        };

        document.insert(record.key_phrase, value);
    }

    Ok(document)
}
