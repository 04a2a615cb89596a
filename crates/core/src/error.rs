//! Error types for the goya PostScript and PDF interpretation library.

use thiserror::Error;

/// Primary error type for PostScript execution and PDF parsing.
#[derive(Error, Debug)]
pub enum GoyaError {
    #[error("stack underflow: {0}")]
    StackUnderflow(&'static str),

    #[error("type error: expected {expected}, got {got}")]
    TypeError {
        expected: &'static str,
        got: &'static str,
    },

    #[error("range error: {0}")]
    Range(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("undefined name: {0}")]
    Undefined(String),

    #[error("unterminated {construct} starting at byte {pos}")]
    Lex {
        construct: &'static str,
        pos: usize,
    },

    #[error("invalid token at position {pos}: {msg}")]
    TokenError { pos: usize, msg: String },

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("PDF object not found: {0}")]
    ObjectNotFound(u32),

    #[error("no valid xref table found")]
    NoValidXRef,

    #[error("PDF syntax error: {0}")]
    Syntax(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias for GoyaError.
pub type Result<T> = std::result::Result<T, GoyaError>;
