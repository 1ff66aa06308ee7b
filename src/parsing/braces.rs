//! Value grammar for command bodies
//!
//! A body is a brace-delimited block of `key value` entries, one per line.
//! Values are quoted or bare strings, nested blocks, or runs of several
//! words which are kept verbatim. Nested blocks are either lists (all
//! elements on the line of the opening brace, or one element per line, and
//! no further nesting) or dicts.

use crate::language::{Document, Value};

use super::errors::ParsingError;
use super::scalar::classify_scalar;

/// Parse the body found at `span` within `original` into a dict. Offsets in
/// any error are absolute positions in `original`.
pub fn parse_body(
    original: &str,
    span: (usize, usize),
    max_nesting: usize,
) -> Result<Document, ParsingError> {
    let mut input = Parser::new(original, span, max_nesting);

    let document = input.read_dict(1)?;

    input.trim_whitespace();
    if !input.is_finished() {
        return Err(ParsingError::AmbiguousOrMalformedValue(input.offset));
    }

    Ok(document)
}

// A single word: bare text, quoted text, or segments of both run together.
struct Token {
    text: String,
    start: usize,
    end: usize,
    bare: bool,
    quoted: usize,
}

impl Token {
    fn is_mixed(&self) -> bool {
        self.quoted > 1 || (self.bare && self.quoted > 0)
    }

    /// As a dict value, where strings are never coerced.
    fn into_value(self, original: &str) -> Value {
        if self.is_mixed() {
            Value::Raw(original[self.start..self.end].to_string())
        } else {
            Value::Str(self.text)
        }
    }

    /// As a list element, where bare words are typed.
    fn into_element(self, original: &str) -> Value {
        if self.is_mixed() {
            Value::Raw(original[self.start..self.end].to_string())
        } else if self.quoted == 1 {
            Value::Str(self.text)
        } else {
            classify_scalar(&self.text)
        }
    }
}

#[derive(Debug)]
struct Parser<'i> {
    original: &'i str,
    source: &'i str,
    offset: usize,
    max_nesting: usize,
}

impl<'i> Parser<'i> {
    fn new(original: &'i str, span: (usize, usize), max_nesting: usize) -> Parser<'i> {
        Parser {
            original,
            source: &original[span.0..span.1],
            offset: span.0,
            max_nesting,
        }
    }

    fn advance(&mut self, width: usize) {
        self.source = &self.source[width..];
        self.offset += width;
    }

    fn peek(&self) -> Option<char> {
        self.source
            .chars()
            .next()
    }

    fn is_finished(&self) -> bool {
        self.source
            .is_empty()
    }

    /// Skip whitespace up to the end of the line.
    fn trim_spaces(&mut self) {
        let width = self.source
            .len()
            - self
                .source
                .trim_start_matches(|c: char| c.is_whitespace() && !is_line_break(c))
                .len();
        self.advance(width);
    }

    fn trim_whitespace(&mut self) {
        let width = self.source
            .len()
            - self
                .source
                .trim_start_matches(char::is_whitespace)
                .len();
        self.advance(width);
    }

    fn skip_line(&mut self) {
        match self
            .source
            .find('\n')
        {
            Some(i) => self.advance(i + 1),
            None => self.advance(
                self.source
                    .len(),
            ),
        }
    }

    fn at_entry_end(&self) -> bool {
        matches!(self.peek(), None | Some('\n') | Some('\r') | Some('}'))
    }

    /// An entry ends with a line ending, or with the closing brace of the
    /// dict it is in (left for the caller to consume).
    fn require_entry_end(&mut self) -> Result<(), ParsingError> {
        if self
            .source
            .starts_with("\r\n")
        {
            self.advance(2);
            return Ok(());
        }
        match self.peek() {
            Some('\n') => {
                self.advance(1);
                Ok(())
            }
            None | Some('}') => Ok(()),
            _ => Err(ParsingError::AmbiguousOrMalformedValue(self.offset)),
        }
    }

    fn read_dict(&mut self, depth: usize) -> Result<Document, ParsingError> {
        if depth > self.max_nesting {
            return Err(ParsingError::NestingTooDeep(self.offset));
        }
        if self.peek() != Some('{') {
            return Err(ParsingError::AmbiguousOrMalformedValue(self.offset));
        }
        self.advance(1);

        let mut document = Document::new();

        loop {
            self.trim_whitespace();

            match self.peek() {
                None => return Err(ParsingError::UnterminatedBrace(self.offset)),
                Some('}') => {
                    self.advance(1);
                    return Ok(document);
                }
                Some('#') => self.skip_line(),
                Some('{') => return Err(ParsingError::AmbiguousOrMalformedValue(self.offset)),
                Some(_) => {
                    let key = self.read_token()?;
                    self.trim_spaces();
                    let value = self.read_value(depth)?;
                    self.trim_spaces();
                    self.require_entry_end()?;

                    document.insert(key.text, value);
                }
            }
        }
    }

    fn read_value(&mut self, depth: usize) -> Result<Value, ParsingError> {
        if self.at_entry_end() {
            return Ok(Value::Eol);
        }
        if self.peek() == Some('{') {
            return self.read_block(depth);
        }
        self.read_words()
    }

    // Lists are tried first; anything which is not one is read again as a
    // dict.
    fn read_block(&mut self, depth: usize) -> Result<Value, ParsingError> {
        let source = self.source;
        let offset = self.offset;

        if let Some(elements) = self.read_list()? {
            return Ok(Value::List(elements));
        }

        self.source = source;
        self.offset = offset;

        let document = self.read_dict(depth + 1)?;
        Ok(Value::Dict(document))
    }

    fn read_list(&mut self) -> Result<Option<Vec<Value>>, ParsingError> {
        self.advance(1);

        let mut elements = Vec::new();
        let mut rows = Vec::new();
        let mut row = 0;

        loop {
            while let Some(c) = self.peek() {
                match c {
                    '\n' => {
                        row += 1;
                        self.advance(1);
                    }
                    c if c.is_whitespace() => self.advance(c.len_utf8()),
                    _ => break,
                }
            }

            match self.peek() {
                None | Some('{') | Some('#') => return Ok(None),
                Some('}') => {
                    self.advance(1);
                    break;
                }
                Some(_) => {
                    let token = self.read_token()?;
                    rows.push(row);
                    row += self.original[token.start..token.end]
                        .matches('\n')
                        .count();
                    elements.push(token.into_element(self.original));
                }
            }
        }

        if elements.is_empty() {
            return Ok(None);
        }

        let same_line = rows
            .iter()
            .all(|&r| r == 0);
        let one_per_line = rows[0] > 0
            && rows
                .windows(2)
                .all(|pair| pair[0] < pair[1]);

        if same_line || one_per_line {
            Ok(Some(elements))
        } else {
            Ok(None)
        }
    }

    // A single word stays a string; several words, or words followed by a
    // block, are kept exactly as written.
    fn read_words(&mut self) -> Result<Value, ParsingError> {
        let first = self.read_token()?;
        self.trim_spaces();

        if self.at_entry_end() {
            return Ok(first.into_value(self.original));
        }

        let start = first.start;
        let mut end = first.end;

        loop {
            match self.peek() {
                Some('{') => {
                    self.skip_block()?;
                    end = self.offset;
                    self.trim_spaces();
                    break;
                }
                None | Some('\n') | Some('\r') | Some('}') => break,
                Some(_) => {
                    let token = self.read_token()?;
                    end = token.end;
                    self.trim_spaces();
                }
            }
        }

        Ok(Value::Raw(self.original[start..end].to_string()))
    }

    fn read_token(&mut self) -> Result<Token, ParsingError> {
        let start = self.offset;
        let mut text = String::new();
        let mut bare = false;
        let mut quoted = 0;

        loop {
            match self.peek() {
                None => break,
                Some(c) if c.is_whitespace() || c == '{' || c == '}' => break,
                Some('"') => {
                    text.push_str(&self.read_quoted('"')?);
                    quoted += 1;
                }
                Some('\'') if self.offset == start => {
                    text.push_str(&self.read_quoted('\'')?);
                    quoted += 1;
                }
                Some(_) => {
                    let width = self
                        .source
                        .find(|c: char| c.is_whitespace() || c == '{' || c == '}' || c == '"')
                        .unwrap_or(
                            self.source
                                .len(),
                        );
                    text.push_str(&self.source[..width]);
                    self.advance(width);
                    bare = true;
                }
            }
        }

        if self.offset == start {
            return Err(ParsingError::AmbiguousOrMalformedValue(start));
        }

        Ok(Token {
            text,
            start,
            end: self.offset,
            bare,
            quoted,
        })
    }

    fn read_quoted(&mut self, quote: char) -> Result<String, ParsingError> {
        let open = self.offset;
        let source = self.source;
        let mut text = String::new();
        let mut chars = source
            .char_indices()
            .skip(1);

        loop {
            match chars.next() {
                None => return Err(ParsingError::UnterminatedQuote(open)),
                Some((_, '\\')) => match chars.next() {
                    None => return Err(ParsingError::UnterminatedQuote(open)),
                    Some((_, c)) => text.push(unescape(c)),
                },
                Some((i, c)) if c == quote => {
                    self.advance(i + 1);
                    return Ok(text);
                }
                Some((_, c)) => text.push(c),
            }
        }
    }

    // Step over a balanced block without interpreting it. Quoted strings
    // inside may contain braces.
    fn skip_block(&mut self) -> Result<(), ParsingError> {
        let mut level = 0;

        loop {
            match self.peek() {
                None => return Err(ParsingError::UnterminatedBrace(self.offset)),
                Some('"') => {
                    self.read_quoted('"')?;
                }
                Some('\\') => {
                    let width = self.source[1..]
                        .chars()
                        .next()
                        .map_or(0, char::len_utf8);
                    self.advance(1 + width);
                }
                Some(c) => {
                    if c == '{' {
                        level += 1;
                    } else if c == '}' {
                        level -= 1;
                    }
                    self.advance(c.len_utf8());
                    if level == 0 {
                        return Ok(());
                    }
                }
            }
        }
    }
}

fn is_line_break(c: char) -> bool {
    c == '\n' || c == '\r'
}

fn unescape(c: char) -> char {
    match c {
        't' => '\t',
        'n' => '\n',
        'f' => '\x0c',
        'r' => '\r',
        'b' => '\x08',
        _ => c,
    }
}
