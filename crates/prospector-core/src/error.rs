//! Errors raised while reading a record source.
//!
//! A source that does not exist is not an error (it loads as an empty
//! dataset). These variants cover a source that exists but cannot be read.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("data source '{source_name}' is unavailable: {reason}")]
    Unavailable { source_name: String, reason: String },
    #[error("data source '{source_name}' is malformed at line {line}: {reason}")]
    Malformed {
        source_name: String,
        line: u64,
        reason: String,
    },
}
