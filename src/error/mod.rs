//! Reporting of parsing failures

mod display;

pub use display::*;
