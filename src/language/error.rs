use std::{fmt, path::Path};

use thiserror::Error;

/// Failure to read a configuration file from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingError<'i> {
    pub problem: String,
    pub details: String,
    pub filename: &'i Path,
}

impl<'i> fmt::Display for LoadingError<'i> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}: {}",
            self.filename
                .to_string_lossy(),
            self.problem,
            self.details
        )
    }
}

/// Problems with operations on an already parsed document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("no entry with key {0:?}")]
    KeyNotFound(String),
    #[error("an entry with key {0:?} already exists")]
    DuplicateKey(String),
    #[error("nothing bound to placeholder {0:?}")]
    MissingBinding(String),
    #[error("invalid pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}
