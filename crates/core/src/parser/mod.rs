//! PostScript and PDF parsing modules.
//!
//! - `lexer`: PostScript tokenizer producing raw token strings
//! - `pdf_parser`: PDF object parser

pub mod lexer;
pub mod pdf_parser;

// Re-export main types for convenience
pub use lexer::{tokenize, Lexer};
pub use pdf_parser::{PdfParser, PdfToken};
