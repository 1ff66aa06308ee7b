//! Encoder turning a Document back into TMSH configuration text

use crate::formatting::*;
use crate::language::*;
use crate::parsing::classify_scalar;

/// Spaces per level of nesting.
const INDENT: usize = 4;

/// Encode a document as plain configuration text.
pub fn encode(document: &Document) -> String {
    encode_with_renderer(document, &Identity)
}

/// We encode in two passes. First the document is converted into a Vec of
/// "fragments" (Syntax tag, String pairs), then the renderer is applied to
/// each pair to give the embellished (or plain) text.
pub fn encode_with_renderer(document: &Document, renderer: &dyn Render) -> String {
    let fragments = encode_to_fragments(document);
    render_to_string(renderer, fragments)
}

pub fn encode_to_fragments(document: &Document) -> Vec<(Syntax, String)> {
    let mut output = Formatter::new();

    output.format_document(document);
    output.flush_current();

    output.fragments
}

struct Formatter {
    fragments: Vec<(Syntax, String)>,
    nesting: usize,
    buffer: String,
}

impl Formatter {
    fn new() -> Formatter {
        Formatter {
            fragments: Vec::new(),
            nesting: 0,
            buffer: String::new(),
        }
    }

    /// Append content with specific syntax tagging, maintaining order
    fn append(&mut self, syntax: Syntax, content: &str) {
        // Flush any pending buffer content first to maintain order
        self.flush_current();
        self.fragments
            .push((syntax, content.to_string()));
    }

    fn append_char(&mut self, c: char) {
        self.buffer
            .push(c);
    }

    fn flush_current(&mut self) {
        if !self
            .buffer
            .is_empty()
        {
            self.fragments
                .push((
                    Syntax::Neutral,
                    self.buffer
                        .clone(),
                ));
            self.buffer
                .clear();
        }
    }

    fn increase(&mut self) {
        self.nesting += 1;
    }

    fn decrease(&mut self) {
        self.nesting -= 1;
    }

    fn indent(&mut self) {
        if self.nesting > 0 {
            let spaces = " ".repeat(self.nesting * INDENT);
            self.append(Syntax::Indent, &spaces);
        }
    }

    fn newline(&mut self) {
        self.append(Syntax::Newline, "\n");
    }

    // Top level keys are whole key phrases like `ltm pool /Common/p1` and are
    // written exactly as they are.
    fn format_document(&mut self, document: &Document) {
        for (key, value) in document.iter() {
            self.append(Syntax::Key, key);
            self.append_value_after_key(value);
            self.newline();
        }
    }

    fn append_entry(&mut self, key: &str, value: &Value) {
        self.append_text(Syntax::Key, key, false);
        self.append_value_after_key(value);
    }

    fn append_value_after_key(&mut self, value: &Value) {
        if is_absent(value) {
            return;
        }
        self.append_char(' ');
        self.append_value(value);
    }

    fn append_value(&mut self, value: &Value) {
        match value {
            Value::Str(text) => self.append_text(Syntax::String, text, false),
            Value::Raw(text) => self.append(Syntax::Raw, text),
            Value::Int(number) => self.append(Syntax::Numeric, &number.to_string()),
            Value::Float(number) => self.append(Syntax::Numeric, &float_text(*number)),
            Value::Bool(flag) => self.append(Syntax::Keyword, if *flag { "true" } else { "false" }),
            Value::None => self.append(Syntax::Keyword, "none"),
            Value::Eol => {}
            Value::List(items) => self.append_list(items),
            Value::Dict(document) => {
                if document.is_inline() {
                    self.append_inline(document);
                } else {
                    self.append_dict(document);
                }
            }
        }
    }

    fn append_text(&mut self, syntax: Syntax, text: &str, in_list: bool) {
        if needs_quotes(text, in_list) {
            self.append(syntax, &quote(text));
        } else {
            self.append(syntax, text);
        }
    }

    fn append_list(&mut self, items: &[Value]) {
        self.append(Syntax::Structure, "{");
        for item in items
            .iter()
            .filter(|item| !item.is_eol())
        {
            self.append_char(' ');
            match item {
                Value::Str(text) => self.append_text(Syntax::String, text, true),
                Value::Float(number) => self.append(Syntax::Numeric, &element_float_text(*number)),
                other => self.append_value(other),
            }
        }
        self.append_char(' ');
        self.append(Syntax::Structure, "}");
    }

    fn append_dict(&mut self, document: &Document) {
        if document.is_empty() {
            self.append(Syntax::Structure, "{");
            self.append_char(' ');
            self.append(Syntax::Structure, "}");
            return;
        }

        self.append(Syntax::Structure, "{");
        self.newline();
        self.increase();

        for (key, value) in document.iter() {
            self.indent();
            self.append_entry(key, value);
            self.newline();
        }

        self.decrease();
        self.indent();
        self.append(Syntax::Structure, "}");
    }

    // The first entry continues the owner's line; the rest line up with the
    // owner.
    fn append_inline(&mut self, document: &Document) {
        for (i, (key, value)) in document
            .iter()
            .enumerate()
        {
            if i > 0 {
                self.newline();
                self.indent();
            }
            self.append_entry(key, value);
        }
    }
}

fn is_absent(value: &Value) -> bool {
    match value {
        Value::Eol => true,
        Value::Dict(document) => document.is_inline() && document.is_empty(),
        _ => false,
    }
}

/// Whether a string has to be quoted to be read back as the same string.
fn needs_quotes(text: &str, in_list: bool) -> bool {
    if text.is_empty() || text.starts_with('#') {
        return true;
    }
    if text
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '%' | '{' | '}' | '"' | '\''))
    {
        return true;
    }
    // bare list elements are typed when read
    in_list && !matches!(classify_scalar(text), Value::Str(_))
}

fn quote(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + 2);
    result.push('"');
    for c in text.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            '\x08' => result.push_str("\\b"),
            '\x0c' => result.push_str("\\f"),
            '\r' => result.push_str("\\r"),
            _ => result.push(c),
        }
    }
    result.push('"');
    result
}

fn float_text(number: f64) -> String {
    if number.is_nan() {
        "NaN".to_string()
    } else if number == f64::INFINITY {
        "Infinity".to_string()
    } else if number == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        let text = number.to_string();
        if text.contains('.') {
            text
        } else {
            text + ".0"
        }
    }
}

/// Bare list elements are typed when read, and an unsigned `digits.digits`
/// element reads back as a string. Whole numbers are therefore written as
/// `3.` and fractions below one as `.25`, both of which read back as floats.
/// Other unsigned values such as 12.5 have no bare spelling that does.
fn element_float_text(number: f64) -> String {
    if !number.is_finite() || number.is_sign_negative() {
        return float_text(number);
    }
    if number.fract() == 0.0 {
        return format!("{}.", number);
    }
    let text = number.to_string();
    match text.strip_prefix('0') {
        Some(fraction) => fraction.to_string(),
        None => text,
    }
}
