//! Graphics state - the bundle of path, transform, color, and line
//! width active during path construction and painting.

use crate::utils::{Matrix, Point, MATRIX_IDENTITY};

/// One segment of the path under construction.
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    /// Two control points, then the end point.
    CurveTo(Point, Point, Point),
    Close,
}

/// The graphics state carried by the interpreter.
///
/// `gsave` pushes a deep copy onto the graphics stack; `grestore` pops
/// it. The stack is never left empty.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsState {
    /// Current point, updated by moveto/lineto/curveto.
    pub current_point: Point,
    /// Path accumulated since the last newpath/stroke/fill.
    pub path: Vec<PathSegment>,
    /// Current transformation matrix.
    pub ctm: Matrix,
    /// Line width for stroke operations.
    pub line_width: f64,
    /// Stroke color as RGB components in [0, 1].
    pub rgb: (f64, f64, f64),
}

impl GraphicsState {
    /// Create a graphics state with default values: identity CTM,
    /// black, line width 1.
    pub fn new() -> Self {
        Self {
            current_point: (0.0, 0.0),
            path: Vec::new(),
            ctm: MATRIX_IDENTITY,
            line_width: 1.0,
            rgb: (0.0, 0.0, 0.0),
        }
    }

    /// Create a deep copy of this graphics state, path included.
    pub fn copy(&self) -> Self {
        self.clone()
    }
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self::new()
    }
}
