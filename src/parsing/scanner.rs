//! Boundary scanner for TMSH text
//!
//! Configuration text follows Tcl's word rules closely enough that the
//! command boundaries can be found with a Tcl scanner: a command runs to the
//! next unquoted `;` or newline, and braces, quotes, and brackets can nest
//! inside one another. The scanner does not interpret anything; it produces
//! a tree of [`Node`]s whose spans point back into the source.
//!
//! Command substitution (`[...]`) re-enters the script grammar. Rather than
//! recursing, the scanner keeps its own stack of partially built frames, so
//! the depth of nesting is limited by memory rather than by the call stack.

use tracing::trace;

use super::errors::ParsingError;
use super::nodes::{CommandRecord, Escape, Node, NodeKind};

/// Scan the given text into a `Script` node.
pub fn scan(source: &str) -> Result<Node, ParsingError> {
    let mut scanner = Scanner::new(source);
    scanner.run()
}

/// Find the top-level commands which have a braced body. The key phrase is
/// everything before the first braced word, the body is that word, braces
/// included. Commands without a braced word are skipped.
pub fn extract_commands(source: &str, script: &Node) -> Vec<CommandRecord> {
    let mut records = Vec::new();

    for command in script
        .children
        .iter()
        .filter(|node| node.kind == NodeKind::Command)
    {
        let body = command
            .children
            .iter()
            .find(|node| node.kind == NodeKind::BracedLiteral);

        if let Some(body) = body {
            let key = source[command
                .span
                .start..body
                .span
                .start]
                .trim();

            records.push(CommandRecord {
                key_phrase: key.to_string(),
                body_span: (
                    body.span
                        .start,
                    body.span
                        .end,
                ),
            });
        }
    }

    records
}

// How a word in progress is delimited.
enum Shape {
    Raw,
    Quoted,
    // the index part of `$name(index)`; `dollar` is where the whole
    // substitution began.
    Index { dollar: usize, name: Node },
}

enum Frame {
    Script {
        start: usize,
        children: Vec<Node>,
        nested: bool,
        closed: bool,
    },
    Command {
        start: usize,
        children: Vec<Node>,
        nested: bool,
        complete: bool,
    },
    Word {
        start: usize,
        literal: usize,
        portions: Vec<Node>,
        nested: bool,
        shape: Shape,
    },
}

// What the frame on top of the stack asked for.
enum Step {
    Continue,
    Push(Frame),
    Finish,
}

// Result of looking at a `$`.
enum Variable {
    Literal,
    Scalar(Node),
    Array { name: Node, open: usize },
}

struct Scanner<'i> {
    source: &'i str,
    cursor: usize,
    stack: Vec<Frame>,
}

impl<'i> Scanner<'i> {
    fn new(source: &'i str) -> Scanner<'i> {
        Scanner {
            source,
            cursor: 0,
            stack: Vec::new(),
        }
    }

    fn run(&mut self) -> Result<Node, ParsingError> {
        self.stack
            .push(Frame::Script {
                start: 0,
                children: Vec::new(),
                nested: false,
                closed: false,
            });

        loop {
            match self.step()? {
                Step::Continue => {}
                Step::Push(frame) => self
                    .stack
                    .push(frame),
                Step::Finish => {
                    let frame = match self
                        .stack
                        .pop()
                    {
                        Some(frame) => frame,
                        None => unreachable!("scanner stack emptied before the script finished"),
                    };
                    let node = self.finish(frame)?;

                    if self
                        .stack
                        .is_empty()
                    {
                        trace!(
                            "Scanned {} top-level nodes",
                            node.children
                                .len()
                        );
                        return Ok(node);
                    }
                    self.deliver(node);
                }
            }
        }
    }

    /// Advance the frame on top of the stack by one token.
    fn step(&mut self) -> Result<Step, ParsingError> {
        let source = self.source;
        let bytes = source.as_bytes();
        let len = bytes.len();
        let cursor = self.cursor;

        let frame = match self
            .stack
            .last_mut()
        {
            Some(frame) => frame,
            None => return Ok(Step::Finish),
        };

        match frame {
            Frame::Script {
                children,
                nested,
                closed,
                ..
            } => {
                if *closed || cursor >= len {
                    return Ok(Step::Finish);
                }
                match bytes[cursor] {
                    b'#' => {
                        let node = comment(bytes, cursor);
                        self.cursor = node
                            .span
                            .end;
                        children.push(node);
                        Ok(Step::Continue)
                    }
                    b' ' | b'\t' => {
                        let node = whitespace(bytes, cursor);
                        self.cursor = node
                            .span
                            .end;
                        children.push(node);
                        Ok(Step::Continue)
                    }
                    _ => Ok(Step::Push(Frame::Command {
                        start: cursor,
                        children: Vec::new(),
                        nested: *nested,
                        complete: false,
                    })),
                }
            }
            Frame::Command {
                children,
                nested,
                complete,
                ..
            } => {
                if *complete || cursor >= len {
                    return Ok(Step::Finish);
                }
                let c = bytes[cursor];
                if c == b' ' || c == b'\t' {
                    let node = whitespace(bytes, cursor);
                    self.cursor = node
                        .span
                        .end;
                    children.push(node);
                    Ok(Step::Continue)
                } else if is_separator(c, *nested) {
                    children.push(Node::leaf(NodeKind::Separator, cursor, cursor + 1));
                    self.cursor = cursor + 1;
                    *complete = true;
                    Ok(Step::Continue)
                } else if c == b'"' {
                    self.cursor = cursor + 1;
                    Ok(Step::Push(Frame::Word {
                        start: cursor,
                        literal: cursor + 1,
                        portions: Vec::new(),
                        nested: *nested,
                        shape: Shape::Quoted,
                    }))
                } else if c == b'{' {
                    let node = braced(bytes, cursor)?;
                    self.cursor = node
                        .span
                        .end;
                    children.push(node);
                    Ok(Step::Continue)
                } else {
                    Ok(Step::Push(Frame::Word {
                        start: cursor,
                        literal: cursor,
                        portions: Vec::new(),
                        nested: *nested,
                        shape: Shape::Raw,
                    }))
                }
            }
            Frame::Word {
                literal,
                portions,
                nested,
                shape,
                ..
            } => {
                if cursor >= len {
                    return match shape {
                        Shape::Raw => Ok(Step::Finish),
                        Shape::Quoted => Err(ParsingError::UnterminatedQuote(len)),
                        Shape::Index { .. } => Err(ParsingError::UnterminatedIndex(len)),
                    };
                }

                let c = bytes[cursor];
                let ended = match shape {
                    Shape::Raw => is_terminator(c, *nested),
                    Shape::Quoted => c == b'"',
                    Shape::Index { .. } => c == b')',
                };
                if ended {
                    return Ok(Step::Finish);
                }

                match c {
                    b'\\' => {
                        flush_literal(portions, *literal, cursor);
                        let node = backslash(source, cursor)?;
                        self.cursor = node
                            .span
                            .end;
                        *literal = self.cursor;
                        portions.push(node);
                        Ok(Step::Continue)
                    }
                    b'$' => match variable(bytes, cursor)? {
                        Variable::Literal => {
                            self.cursor = cursor + 1;
                            Ok(Step::Continue)
                        }
                        Variable::Scalar(node) => {
                            flush_literal(portions, *literal, cursor);
                            self.cursor = node
                                .span
                                .end;
                            *literal = self.cursor;
                            portions.push(node);
                            Ok(Step::Continue)
                        }
                        Variable::Array { name, open } => {
                            flush_literal(portions, *literal, cursor);
                            self.cursor = open + 1;
                            Ok(Step::Push(Frame::Word {
                                start: open,
                                literal: open + 1,
                                portions: Vec::new(),
                                nested: *nested,
                                shape: Shape::Index {
                                    dollar: cursor,
                                    name,
                                },
                            }))
                        }
                    },
                    b'[' => {
                        flush_literal(portions, *literal, cursor);
                        self.cursor = cursor + 1;
                        Ok(Step::Push(Frame::Script {
                            start: cursor,
                            children: Vec::new(),
                            nested: true,
                            closed: false,
                        }))
                    }
                    _ => {
                        self.cursor = cursor + 1;
                        Ok(Step::Continue)
                    }
                }
            }
        }
    }

    /// Turn a completed frame into its node.
    fn finish(&mut self, frame: Frame) -> Result<Node, ParsingError> {
        let len = self
            .source
            .len();
        let cursor = self.cursor;

        match frame {
            Frame::Script {
                start,
                children,
                nested,
                closed,
            } => {
                if !nested {
                    return Ok(Node::branch(NodeKind::Script, start, cursor, children));
                }
                if !closed {
                    return Err(ParsingError::UnterminatedBracket(len));
                }
                Ok(Node::branch(
                    NodeKind::SubstitutionCommand,
                    start,
                    cursor,
                    children,
                ))
            }
            Frame::Command {
                start, children, ..
            } => Ok(Node::branch(NodeKind::Command, start, cursor, children)),
            Frame::Word {
                start,
                literal,
                mut portions,
                nested,
                shape,
            } => match shape {
                Shape::Raw => {
                    flush_literal(&mut portions, literal, cursor);
                    if portions.len() == 1 {
                        if let Some(only) = portions.pop() {
                            return Ok(only);
                        }
                    }
                    if portions.is_empty() {
                        return Ok(Node::leaf(NodeKind::RawLiteral, start, cursor));
                    }
                    Ok(Node::branch(NodeKind::RawMixOf, start, cursor, portions))
                }
                Shape::Quoted => {
                    // the closing quote ends the word, what follows must
                    // separate it from the next one
                    let after = cursor + 1;
                    if after < len {
                        let c = self.source.as_bytes()[after];
                        if !(c == b' ' || c == b'\t' || is_separator(c, nested)) {
                            return Err(ParsingError::TrailingCharacters(after));
                        }
                    }
                    flush_literal(&mut portions, literal, cursor);
                    self.cursor = after;
                    Ok(enclosed(start, after, portions))
                }
                Shape::Index { dollar, name } => {
                    flush_literal(&mut portions, literal, cursor);
                    let after = cursor + 1;
                    self.cursor = after;
                    let index = enclosed(start, after, portions);
                    Ok(Node::branch(
                        NodeKind::SubstitutionArray,
                        dollar,
                        after,
                        vec![name, index],
                    ))
                }
            },
        }
    }

    /// Hand a finished node to the frame now on top of the stack.
    fn deliver(&mut self, mut node: Node) {
        let source = self.source;
        let cursor = self.cursor;

        match self
            .stack
            .last_mut()
        {
            Some(Frame::Script {
                children, closed, ..
            }) => {
                // a command that ended with `]` closes the substitution; the
                // bracket belongs to the substitution, not to the command.
                let closer = matches!(
                    node.children
                        .last(),
                    Some(last) if last.kind == NodeKind::Separator
                        && source.as_bytes()[last.span.start] == b']'
                );
                if closer {
                    node.children
                        .pop();
                    node.span
                        .end -= 1;
                    *closed = true;
                    if node
                        .children
                        .is_empty()
                    {
                        return;
                    }
                }
                children.push(node);
            }
            Some(Frame::Command { children, .. }) => {
                children.push(node);
            }
            Some(Frame::Word {
                literal, portions, ..
            }) => {
                portions.push(node);
                *literal = cursor;
            }
            None => {}
        }
    }
}

fn is_separator(c: u8, nested: bool) -> bool {
    matches!(c, b';' | b'\r' | b'\n') || (nested && c == b']')
}

fn is_terminator(c: u8, nested: bool) -> bool {
    c == b' ' || c == b'\t' || is_separator(c, nested)
}

fn flush_literal(portions: &mut Vec<Node>, literal: usize, cursor: usize) {
    if cursor > literal {
        portions.push(Node::leaf(NodeKind::RawLiteral, literal, cursor));
    }
}

// A quoted word (or array index) which is nothing but literal text collapses
// to a single QuotedLiteral.
fn enclosed(start: usize, end: usize, portions: Vec<Node>) -> Node {
    let plain = match portions.as_slice() {
        [] => true,
        [only] => only.kind == NodeKind::RawLiteral,
        _ => false,
    };
    if plain {
        Node::leaf(NodeKind::QuotedLiteral, start, end)
    } else {
        Node::branch(NodeKind::QuotedMixOf, start, end, portions)
    }
}

fn whitespace(bytes: &[u8], start: usize) -> Node {
    let mut cursor = start;
    while cursor < bytes.len() && matches!(bytes[cursor], b' ' | b'\t') {
        cursor += 1;
    }
    Node::leaf(NodeKind::Whitespace, start, cursor)
}

fn comment(bytes: &[u8], start: usize) -> Node {
    let mut cursor = start;
    while cursor < bytes.len() && !matches!(bytes[cursor], b'\r' | b'\n') {
        cursor += 1;
    }
    while cursor < bytes.len() && matches!(bytes[cursor], b'\r' | b'\n') {
        cursor += 1;
    }
    Node::leaf(NodeKind::Comment, start, cursor)
}

fn skip_continuation(bytes: &[u8], mut cursor: usize) -> usize {
    while cursor < bytes.len() && matches!(bytes[cursor], b'\r' | b'\n' | b' ' | b'\t') {
        cursor += 1;
    }
    cursor
}

fn braced(bytes: &[u8], start: usize) -> Result<Node, ParsingError> {
    let mut portions = Vec::new();
    let mut level = 1;
    let mut cursor = start + 1;

    while cursor < bytes.len() {
        match bytes[cursor] {
            b'{' => {
                level += 1;
                cursor += 1;
            }
            b'}' => {
                level -= 1;
                cursor += 1;
            }
            b'\\' => {
                if cursor + 1 < bytes.len() && matches!(bytes[cursor + 1], b'\r' | b'\n') {
                    let eol = cursor;
                    cursor = skip_continuation(bytes, cursor + 1);
                    portions.push(Node::leaf(NodeKind::Backslash(Escape::Eol), eol, cursor));
                } else {
                    // escaped braces are not counted
                    cursor += 2;
                }
            }
            _ => cursor += 1,
        }

        if level == 0 {
            return Ok(Node::branch(
                NodeKind::BracedLiteral,
                start,
                cursor,
                portions,
            ));
        }
    }

    Err(ParsingError::UnterminatedBrace(bytes.len()))
}

fn backslash(source: &str, start: usize) -> Result<Node, ParsingError> {
    let bytes = source.as_bytes();
    let len = bytes.len();
    let cursor = start + 1;

    if cursor >= len {
        return Err(ParsingError::IncompleteEscape(cursor));
    }

    let (escape, end) = match bytes[cursor] {
        b'a' | b'b' | b'f' | b'n' | b'r' | b't' | b'v' => (Escape::ControlChar, cursor + 1),
        b'\r' | b'\n' => (Escape::Eol, skip_continuation(bytes, cursor)),
        b'0'..=b'7' => {
            let mut end = cursor + 1;
            while end < len && end < cursor + 3 && matches!(bytes[end], b'0'..=b'7') {
                end += 1;
            }
            (Escape::Octal, end)
        }
        b'x' => {
            let mut end = cursor + 1;
            while end < len && bytes[end].is_ascii_hexdigit() {
                end += 1;
            }
            let escape = match end - (cursor + 1) {
                0 => Escape::Char,
                1 => Escape::Hex1,
                2 => Escape::Hex2,
                _ => Escape::HexLast2,
            };
            (escape, end)
        }
        b'u' => {
            let mut end = cursor + 1;
            while end < len && end < cursor + 5 && bytes[end].is_ascii_hexdigit() {
                end += 1;
            }
            if end == cursor + 1 {
                (Escape::Char, end)
            } else {
                (Escape::UnicodeChar, end)
            }
        }
        _ => {
            let width = source[cursor..]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
            (Escape::Char, cursor + width)
        }
    };

    Ok(Node::leaf(NodeKind::Backslash(escape), start, end))
}

fn variable(bytes: &[u8], start: usize) -> Result<Variable, ParsingError> {
    let len = bytes.len();
    let mut cursor = start + 1;

    // ${name} may contain anything but a closing brace
    if cursor < len && bytes[cursor] == b'{' {
        return match bytes[cursor..]
            .iter()
            .position(|&b| b == b'}')
        {
            Some(i) => {
                let end = cursor + i + 1;
                Ok(Variable::Scalar(Node::branch(
                    NodeKind::SubstitutionScalarVariable,
                    start,
                    end,
                    vec![Node::leaf(NodeKind::BracedLiteral, cursor, end)],
                )))
            }
            None => Err(ParsingError::UnterminatedBrace(len)),
        };
    }

    while cursor < len {
        let c = bytes[cursor];
        if c.is_ascii_alphanumeric() || c == b'_' {
            cursor += 1;
        } else if c == b':' {
            // two or more adjacent colons are one namespace separator
            if cursor + 1 < len && bytes[cursor + 1] == b':' {
                cursor += 2;
                while cursor < len && bytes[cursor] == b':' {
                    cursor += 1;
                }
            } else {
                break;
            }
        } else if c == b'(' {
            return Ok(Variable::Array {
                name: Node::leaf(NodeKind::RawLiteral, start + 1, cursor),
                open: cursor,
            });
        } else {
            break;
        }
    }

    if cursor > start + 1 {
        Ok(Variable::Scalar(Node::leaf(
            NodeKind::SubstitutionScalarVariable,
            start,
            cursor,
        )))
    } else {
        Ok(Variable::Literal)
    }
}
