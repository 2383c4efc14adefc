//! Error types for zones file loading and answer synthesis

use std::fmt;
use std::io;
use std::net::AddrParseError;

use derive_more::{Display, Error, From};

/// A single zones file line (or synthesized value) that could not be used
#[derive(Debug)]
pub enum ParseError {
    /// Fewer than the two required tokens
    MissingFields { found: usize },
    /// The address token is not an IP literal
    InvalidAddress { value: String, source: AddrParseError },
    /// The wildcard did not compile to a valid matcher
    InvalidPattern { pattern: String, source: regex::Error },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MissingFields { found } => {
                write!(f, "Expected `<ip> <pattern>`, found {} field(s)", found)
            }
            ParseError::InvalidAddress { value, source } => {
                write!(f, "Invalid address '{}': {}", value, source)
            }
            ParseError::InvalidPattern { pattern, source } => {
                write!(f, "Invalid pattern '{}': {}", pattern, source)
            }
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::MissingFields { .. } => None,
            ParseError::InvalidAddress { source, .. } => Some(source),
            ParseError::InvalidPattern { source, .. } => Some(source),
        }
    }
}

/// Failure to read a zones file or configuration file as a whole
#[derive(Debug, Display, From, Error)]
pub enum PatternError {
    Io(io::Error),
    Config(toml::de::Error),
}

/// Result type alias for pattern table operations
pub type PatternResult<T> = Result<T, PatternError>;
