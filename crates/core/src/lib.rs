//! goya - a PostScript interpreter and PDF content extractor.
//!
//! The PostScript side executes source text as a stack-based program
//! against an abstract graphics state, emitting draw events on a
//! device. The PDF side parses a file's object graph from its
//! cross-reference data, walks the page tree, and hands each page's
//! content streams to the PostScript interpreter through a small
//! operator translation layer.

pub mod document;
pub mod error;
pub mod interp;
pub mod model;
pub mod parser;
pub mod utils;

// Re-export main types for convenience
pub use document::{PdfDocument, PdfPage};
pub use error::{GoyaError, Result};
pub use interp::{
    execute_content, map_pdf_operator, ConsoleDevice, Device, NoopDevice, OperandStack,
    PsInterpreter,
};
pub use model::{GraphicsState, ObjRef, PathSegment, PdfObject, PdfStream, Value};
pub use parser::{Lexer, PdfParser};
