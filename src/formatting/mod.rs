//! Encoding of documents back into configuration text

mod encoder;
mod syntax;

pub use encoder::*;
pub use syntax::*;
