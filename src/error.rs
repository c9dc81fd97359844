//! Error types for the exonkit library.

use thiserror::Error;

/// Errors that can occur during exonkit operations.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A parse error occurred while reading input data.
    #[error("{0}")]
    Parse(String),

    /// A letter outside the nucleotide alphabet was found in a sequence.
    #[error("invalid base '{letter}' at position {position}")]
    InvalidBase { letter: char, position: usize },

    /// A validation constraint was violated.
    #[error("{0}")]
    Validation(String),
}
