//! Nodes produced by the boundary scanner

/// A half-open range of byte offsets into the scanned source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Span {
        Span { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The source text covered by this span.
    pub fn slice<'i>(&self, source: &'i str) -> &'i str {
        &source[self.start..self.end]
    }
}

/// The kinds of backslash sequence recognized inside words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escape {
    ControlChar, // \a \b \f \n \r \t \v
    Eol,         // backslash, newline, and following whitespace
    Octal,       // \o, \oo, \ooo
    Hex1,        // \xh
    Hex2,        // \xhh
    HexLast2,    // \xhhh... (only the last two digits count)
    UnicodeChar, // \uh to \uhhhh
    Char,        // anything else, the backslash is dropped
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Script,
    Command,
    Whitespace,
    Comment,
    Separator,
    RawLiteral,
    QuotedLiteral,
    BracedLiteral,
    RawMixOf,
    QuotedMixOf,
    SubstitutionCommand,
    SubstitutionScalarVariable,
    SubstitutionArray,
    Backslash(Escape),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    pub children: Vec<Node>,
}

impl Node {
    pub fn leaf(kind: NodeKind, start: usize, end: usize) -> Node {
        Node {
            kind,
            span: Span::new(start, end),
            children: Vec::new(),
        }
    }

    pub fn branch(kind: NodeKind, start: usize, end: usize, children: Vec<Node>) -> Node {
        Node {
            kind,
            span: Span::new(start, end),
            children,
        }
    }

    /// Whether this node is one of the word forms a command is made of.
    pub fn is_word(&self) -> bool {
        !matches!(
            self.kind,
            NodeKind::Script
                | NodeKind::Command
                | NodeKind::Whitespace
                | NodeKind::Comment
                | NodeKind::Separator
        )
    }

    /// Walk this node and its descendants depth first, parents before
    /// children. Iterative, so arbitrarily deep trees are fine.
    pub fn walk(&self) -> Vec<&Node> {
        let mut result = Vec::new();
        let mut pending = vec![self];

        while let Some(node) = pending.pop() {
            result.push(node);
            for child in node
                .children
                .iter()
                .rev()
            {
                pending.push(child);
            }
        }

        result
    }
}

// Nested command substitutions can make trees far deeper than the call
// stack, so children are dismantled with a worklist rather than recursively.
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// One top-level `key phrase { body }` command found in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRecord {
    pub key_phrase: String,
    pub body_span: (usize, usize),
}

impl CommandRecord {
    pub fn body<'i>(&self, source: &'i str) -> &'i str {
        &source[self.body_span.0..self.body_span.1]
    }
}
