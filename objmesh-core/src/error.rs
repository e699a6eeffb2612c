//! Error types for geometry and material parsing

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Recoverable, per-token failures raised while scanning a document.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// Token is not fully consumed by the numeric grammar, or overflows
    #[error("invalid number: \"{token}\"")]
    InvalidNumber { token: String },

    /// A vector, face or directive has fewer fields than it needs
    #[error("insufficient tokens: expected {expected}, found {found}")]
    InsufficientTokens { expected: usize, found: usize },

    /// A face-reference segment is present but is not a valid integer
    #[error("invalid face index: \"{token}\"")]
    InvalidIndex { token: String },

    /// A face line with fewer than three references. Reported, never fatal.
    #[error("face has {count} vertex references, at least 3 are required")]
    EmptyFace { count: usize },
}

/// The attribute pool a face-vertex reference points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pool {
    Position,
    Texcoord,
    Normal,
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Pool::Position => "position",
            Pool::Texcoord => "texcoord",
            Pool::Normal => "normal",
        };
        f.write_str(name)
    }
}

/// Fatal failures while turning raw geometry into an indexed mesh.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("{pool} index {index} is out of range (pool has {len} entries)")]
    IndexOutOfRange { pool: Pool, index: i64, len: usize },

    #[error("too many vertices: {count} cannot be addressed by a 32-bit index")]
    TooManyVertices { count: usize },
}

/// Errors surfaced to whoever feeds documents into the pipeline.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Reported by the caller when an input could not be opened
    #[error("cannot open \"{}\": {source}", .path.display())]
    UnopenableInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read input: {0}")]
    Read(#[from] io::Error),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

impl LoadError {
    /// Creates an unopenable input error for `path`.
    pub fn unopenable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::UnopenableInput {
            path: path.into(),
            source,
        }
    }
}

/// A recoverable problem tied to one line of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// One-based line number
    pub line: usize,
    pub directive: String,
    pub error: ParseError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} ({}): {}", self.line, self.directive, self.error)
    }
}
