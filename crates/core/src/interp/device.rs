//! Output devices.
//!
//! The interpreter emits abstract draw events - stroke, fill, shown
//! text, end of page - and a device decides what to do with them. The
//! base trait provides no-op defaults so devices only implement what
//! they care about.

use crate::model::{GraphicsState, PathSegment};
use crate::utils::format_real;
use std::io::Write;

/// Device trait - the interface draw events are delivered through.
///
/// Events carry a snapshot of the graphics state at the moment of
/// emission; the interpreter clears its path right after the call.
pub trait Device {
    /// Text produced by the `show` operator.
    fn show_text(&mut self, _text: &[u8]) {}

    /// The current path is being stroked.
    fn stroke_path(&mut self, _path: &[PathSegment], _state: &GraphicsState) {}

    /// The current path is being filled.
    fn fill_path(&mut self, _path: &[PathSegment], _state: &GraphicsState) {}

    /// End of page (`showpage`).
    fn show_page(&mut self) {}
}

/// Device that swallows every event.
///
/// Used by sub-executors that evaluate composite literals, where draw
/// operators cannot legitimately occur.
pub struct NoopDevice;

impl Device for NoopDevice {}

/// Device that reports events as text on a writer.
///
/// The format mirrors the interpreter's console output: one header
/// line per paint event, one indented line per path segment, then the
/// color and line width in effect.
pub struct ConsoleDevice<W: Write> {
    out: W,
}

impl<W: Write> ConsoleDevice<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consume the device and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn describe_segment(segment: &PathSegment) -> String {
        match segment {
            PathSegment::MoveTo((x, y)) => {
                format!("moveto({}, {})", format_real(*x), format_real(*y))
            }
            PathSegment::LineTo((x, y)) => {
                format!("lineto({}, {})", format_real(*x), format_real(*y))
            }
            PathSegment::CurveTo((x1, y1), (x2, y2), (x3, y3)) => format!(
                "curveto({}, {}, {}, {}, {}, {})",
                format_real(*x1),
                format_real(*y1),
                format_real(*x2),
                format_real(*y2),
                format_real(*x3),
                format_real(*y3)
            ),
            PathSegment::Close => "closepath".to_string(),
        }
    }

    fn report(&mut self, label: &str, path: &[PathSegment], state: &GraphicsState) {
        let _ = writeln!(self.out, "{label}: path with {} segments", path.len());
        for (i, segment) in path.iter().enumerate() {
            let _ = writeln!(self.out, "  {i}: {}", Self::describe_segment(segment));
        }
        let (r, g, b) = state.rgb;
        let _ = writeln!(
            self.out,
            "  color: rgb({}, {}, {})",
            format_real(r),
            format_real(g),
            format_real(b)
        );
        let _ = writeln!(self.out, "  line width: {}", format_real(state.line_width));
    }
}

impl<W: Write> Device for ConsoleDevice<W> {
    fn show_text(&mut self, text: &[u8]) {
        let _ = self.out.write_all(text);
        let _ = self.out.flush();
    }

    fn stroke_path(&mut self, path: &[PathSegment], state: &GraphicsState) {
        self.report("STROKE", path, state);
    }

    fn fill_path(&mut self, path: &[PathSegment], state: &GraphicsState) {
        self.report("FILL", path, state);
    }

    fn show_page(&mut self) {
        let _ = writeln!(self.out, "SHOWPAGE: end of page");
    }
}
