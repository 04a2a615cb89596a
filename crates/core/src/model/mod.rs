//! Core data model - PostScript values, PDF objects, and graphics state.
//!
//! This module contains:
//! - `value` - the PostScript tagged value (`Value`) and arithmetic promotion
//! - `objects` - PDF object types (`PdfObject`, `PdfStream`, `ObjRef`)
//! - `state` - graphics state and path segments

pub mod objects;
pub mod state;
pub mod value;

// Re-export main types for convenience
pub use objects::{ObjRef, PdfObject, PdfStream};
pub use state::{GraphicsState, PathSegment};
pub use value::{ArrayHandle, DictHandle, NumericPair, ProcBody, Value};
