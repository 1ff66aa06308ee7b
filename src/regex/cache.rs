/// Compile a regular expression once and hand back a `&'static Regex`.
/// Patterns are literals in this crate, so a bad one is a bug and panics on
/// first use.
#[macro_export]
macro_rules! compile {
    ($pattern:expr) => {{
        use std::sync::OnceLock;
        static REGEX: OnceLock<::regex::Regex> = OnceLock::new();
        REGEX.get_or_init(|| ::regex::Regex::new($pattern).unwrap_or_else(|e| panic!("{}", e)))
    }};
}
