//! Reading and writing configuration in the TMSH language.
//!
//! [`parse`] turns configuration text into an ordered [`Document`] of
//! [`Value`]s, and [`encode`] writes one back out.

pub mod error;
pub mod formatting;
pub mod language;
pub mod parsing;
mod regex;

pub use error::ParseError;
pub use formatting::{encode, encode_with_renderer};
pub use language::{Document, DocumentError, Value, DEFAULT_FORMAT_DEPTH};
pub use parsing::{classify_scalar, parse, parse_with, ParserConfig, ParsingError};
