use std::path::PathBuf;
use thiserror::Error;

/// A shard could not be turned into index entries.
///
/// Raised at load time; the offending shard is rejected as a whole.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("{shard}:{line}:{column}: {message}")]
    Syntax {
        shard: String,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("{shard}: entry {entry}: missing {field}")]
    MissingField {
        shard: String,
        entry: usize,
        field: &'static str,
    },

    #[error("{shard}: duplicate entry '{key}' ({label})")]
    DuplicateKey {
        shard: String,
        key: String,
        label: String,
    },

    #[error("{shard}: entry '{key}' has no targets")]
    EmptyTargets { shard: String, key: String },

    #[error("invalid shard file name: {0}")]
    InvalidShardName(String),
}

impl ParseError {
    /// Name of the shard the error was raised for, if known.
    pub fn shard(&self) -> Option<&str> {
        match self {
            ParseError::Syntax { shard, .. }
            | ParseError::MissingField { shard, .. }
            | ParseError::DuplicateKey { shard, .. }
            | ParseError::EmptyTargets { shard, .. } => Some(shard),
            ParseError::InvalidShardName(_) => None,
        }
    }
}

/// Main error type for index construction and command execution.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("failed to parse config {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("unknown section '{0}'")]
    UnknownSection(String),
}

impl IndexError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IndexError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for index operations.
pub type Result<T> = std::result::Result<T, IndexError>;
