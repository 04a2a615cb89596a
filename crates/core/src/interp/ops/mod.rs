//! PostScript operator implementations.
//!
//! Operators are grouped by category:
//! - `arith` - arithmetic and comparison (add, sub, mul, div, eq, ne, lt, le, gt, ge)
//! - `stack` - stack manipulation and output (dup, pop, exch, clear, stack, show)
//! - `array` - array operators (array, get, put, length, aload, astore, forall)
//! - `dict` - dictionary operators (dict, def, load, store, known, keys)
//! - `control` - control flow (if, ifelse, repeat, for, exec)
//! - `path` - path construction and painting (moveto, lineto, curveto, closepath, newpath, stroke, fill, showpage)
//! - `gstate` - graphics state and transforms (gsave, grestore, setrgbcolor, setgray, setlinewidth, translate, scale, rotate, concat)

mod arith;
mod array;
mod control;
mod dict;
mod gstate;
mod path;
mod stack;

// Each file defines an impl block for PsInterpreter, so no pub use is
// needed - the methods are available on the type.
