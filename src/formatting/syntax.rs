//! Renderers for colourizing TMSH configuration text

use owo_colors::OwoColorize;

/// Types of content that can be rendered with different styles
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Syntax {
    Neutral, // default
    Indent,
    Newline,
    Key,
    String,
    Raw,
    Numeric,
    Keyword,
    Structure,
}

/// Trait for different rendering backends (the no-op no-markup one, and ANSI
/// escapes for terminal colouring)
pub trait Render {
    /// Apply styling to content with the specified syntax type
    fn render(&self, syntax: Syntax, content: &str) -> String;
}

/// Returns content unchanged, with no markup applied
pub struct Identity;

impl Render for Identity {
    fn render(&self, _syntax: Syntax, content: &str) -> String {
        content.to_string()
    }
}

/// Embellish fragments with ANSI escapes to create syntax highlighting in
/// terminal output.
pub struct Terminal;

impl Render for Terminal {
    fn render(&self, syntax: Syntax, content: &str) -> String {
        match syntax {
            Syntax::Neutral => content.to_string(),
            Syntax::Indent => content.to_string(),
            Syntax::Newline => content.to_string(),
            Syntax::Key => content // entity.name - #3465a4 (blue) bold
                .color(owo_colors::Rgb(52, 101, 164))
                .bold()
                .to_string(),
            Syntax::String => content // string - #4e9a06 (green)
                .color(owo_colors::Rgb(78, 154, 6))
                .to_string(),
            Syntax::Raw => content // markup.raw - #8f5902 (brown)
                .color(owo_colors::Rgb(143, 89, 2))
                .to_string(),
            Syntax::Numeric => content // constant.numeric - #ad7fa8 (purple) bold
                .color(owo_colors::Rgb(173, 127, 168))
                .bold()
                .to_string(),
            Syntax::Keyword => content // constant.language - #cc0000 (red) bold
                .color(owo_colors::Rgb(204, 0, 0))
                .bold()
                .to_string(),
            Syntax::Structure => content // punctuation.section.braces - #999999 bold
                .color(owo_colors::Rgb(153, 153, 153))
                .bold()
                .to_string(),
        }
    }
}

/// Apply markup to fragments via render() and combine.
pub fn render_to_string(renderer: &dyn Render, fragments: Vec<(Syntax, String)>) -> String {
    let mut output = String::new();

    for (syntax, content) in fragments {
        let rendered = renderer.render(syntax, &content);
        output.push_str(&rendered);
    }

    output
}
