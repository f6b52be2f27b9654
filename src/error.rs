//! Error types for the category community analyzer

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the library
pub type Result<T> = std::result::Result<T, Error>;

/// Reasons a single text record can be rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("expected 5 fields, found {0}")]
    FieldCount(usize),

    #[error("unknown node kind '{0}' (expected 'cat' or 'page')")]
    UnknownNodeKind(String),

    #[error("unknown relation '{0}' (expected CsubC, CsupC, CP or PC)")]
    UnknownRelation(String),

    #[error("relation {relation} cannot link a {origin} to a {destiny}")]
    KindMismatch {
        relation: &'static str,
        origin: &'static str,
        destiny: &'static str,
    },
}

/// Errors surfaced by store loading, configuration and result persistence
#[derive(Debug, Error)]
pub enum Error {
    #[error("line {line_number}: {kind}: '{line}'")]
    Parse {
        line_number: usize,
        line: String,
        #[source]
        kind: RecordError,
    },

    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter { name: &'static str, message: String },

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid(name: &'static str, message: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            message: message.into(),
        }
    }
}
