use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during parsing
#[derive(Error, Debug)]
pub enum ParserError {
    /// Failed to read file
    #[error("IO error reading {0}: {1}")]
    IoError(PathBuf, #[source] std::io::Error),

    /// Input that the declaration grammar could not match
    #[error("Syntax error in {0}:{1}:{2}: {3}")]
    SyntaxError(PathBuf, usize, usize, String),

    /// File too large
    #[error("File {0} exceeds maximum size ({1} bytes)")]
    FileTooLarge(PathBuf, usize),

    /// Events arrived in an order the accumulation drivers cannot follow.
    /// Only raised when `ParserConfig::strict_transitions` is set.
    #[error("Invalid event sequence in {0}: {1}")]
    InvalidTransition(PathBuf, String),

    /// Fact index insertion or persistence error
    #[error("Failed to update fact index: {0}")]
    IndexError(String),
}

impl From<cppfacts::FactError> for ParserError {
    fn from(err: cppfacts::FactError) -> Self {
        ParserError::IndexError(err.to_string())
    }
}

/// Result type for parser operations
pub type ParserResult<T> = Result<T, ParserError>;
