use std::path::Path;

use owo_colors::OwoColorize;
use thiserror::Error;

use crate::parsing::{LineIndex, ParsingError};

/// A parsing failure located in the source text. `line` and `column` are
/// 1-origin, the column counting characters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}:{column}: {problem}")]
pub struct ParseError {
    pub problem: ParsingError,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl ParseError {
    pub fn new(problem: ParsingError, index: &LineIndex) -> ParseError {
        let offset = problem.offset();
        let (line, column) = index.locate(offset);

        ParseError {
            problem,
            offset,
            line,
            column,
        }
    }

    // Verbose detailed explanation
    pub fn full_details(&self, filename: &Path, source: &str) -> String {
        let index = LineIndex::new(source);
        let code = index
            .line(self.line)
            .unwrap_or("?");

        let line = self.line;
        let j = self.column;

        let width = line
            .to_string()
            .len();
        let width = 3.max(width);

        format!(
            r#"
{}: {}
{}:{}:{}

{:width$} {}
{:width$} {} {}
{:width$} {} {:>j$}

{}
            "#,
            "error".bright_red(),
            self.problem
                .to_string()
                .bold(),
            filename.to_string_lossy(),
            line,
            self.column,
            ' ',
            '|'.bright_blue(),
            line.bright_blue(),
            '|'.bright_blue(),
            code,
            ' ',
            '|'.bright_blue(),
            '^'.bright_red(),
            self.problem
                .details()
        )
        .trim_ascii()
        .to_string()
    }
}
