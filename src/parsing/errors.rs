use thiserror::Error;

/// Problems encountered while scanning or parsing configuration text. Every
/// variant carries the byte offset into the original source where the
/// problem was detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParsingError {
    #[error("missing closing quote")]
    UnterminatedQuote(usize),
    #[error("missing closing brace")]
    UnterminatedBrace(usize),
    #[error("missing closing bracket")]
    UnterminatedBracket(usize),
    #[error("missing closing parenthesis in array index")]
    UnterminatedIndex(usize),
    #[error("incomplete backslash substitution at end of input")]
    IncompleteEscape(usize),
    #[error("extra characters after closing quote")]
    TrailingCharacters(usize),
    #[error("value does not match any known form")]
    AmbiguousOrMalformedValue(usize),
    #[error("blocks nested too deeply")]
    NestingTooDeep(usize),
}

impl ParsingError {
    pub fn offset(&self) -> usize {
        match self {
            ParsingError::UnterminatedQuote(offset) => *offset,
            ParsingError::UnterminatedBrace(offset) => *offset,
            ParsingError::UnterminatedBracket(offset) => *offset,
            ParsingError::UnterminatedIndex(offset) => *offset,
            ParsingError::IncompleteEscape(offset) => *offset,
            ParsingError::TrailingCharacters(offset) => *offset,
            ParsingError::AmbiguousOrMalformedValue(offset) => *offset,
            ParsingError::NestingTooDeep(offset) => *offset,
        }
    }

    /// A longer explanation, suitable for showing underneath the source
    /// excerpt when reporting to a person.
    pub fn details(&self) -> &'static str {
        match self {
            ParsingError::UnterminatedQuote(_) => {
                "A double quote opened a string but the input ended before the matching quote."
            }
            ParsingError::UnterminatedBrace(_) => {
                "Every '{' must be matched by a '}'; the input ended while a block was still open."
            }
            ParsingError::UnterminatedBracket(_) => {
                "A '[' started a command substitution that was never closed by ']'."
            }
            ParsingError::UnterminatedIndex(_) => {
                "A variable reference of the form $name( needs a closing ')'."
            }
            ParsingError::IncompleteEscape(_) => {
                "A backslash at the very end of the input has nothing to escape."
            }
            ParsingError::TrailingCharacters(_) => {
                "A quoted word must be followed by whitespace or the end of the command."
            }
            ParsingError::AmbiguousOrMalformedValue(_) => {
                "Expected a key optionally followed by a value, one entry per line."
            }
            ParsingError::NestingTooDeep(_) => {
                "Blocks are nested more deeply than the configured limit allows."
            }
        }
    }
}
