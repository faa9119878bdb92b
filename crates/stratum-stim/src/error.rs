//! Error types for the circuit text parser.

use stratum_ir::IrError;
use thiserror::Error;

/// Errors that can occur during parsing.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Lexer error (invalid token).
    #[error("Lexer error at line {line}: {message}")]
    LexerError { line: usize, message: String },

    /// Unexpected token.
    #[error("Unexpected token at line {line}: expected {expected}, found {found}")]
    UnexpectedToken {
        line: usize,
        expected: String,
        found: String,
    },

    /// Unexpected end of input.
    #[error("Unexpected end of input: {0}")]
    UnexpectedEof(String),

    /// Malformed instruction target.
    #[error("Invalid target at line {line}: {message}")]
    InvalidTarget { line: usize, message: String },

    /// IR error during circuit construction.
    #[error("Invalid instruction at line {line}: {source}")]
    CircuitError {
        line: usize,
        #[source]
        source: IrError,
    },
}

impl ParseError {
    /// Line the error was reported at, when known.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::LexerError { line, .. }
            | ParseError::UnexpectedToken { line, .. }
            | ParseError::InvalidTarget { line, .. }
            | ParseError::CircuitError { line, .. } => Some(*line),
            ParseError::UnexpectedEof(_) => None,
        }
    }
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;
