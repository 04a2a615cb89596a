//! Path construction and painting operators.
//!
//! Construction appends to the current graphics state's path;
//! painting hands the accumulated path to the device together with a
//! state snapshot, then clears it.

use crate::error::Result;
use crate::interp::device::Device;
use crate::interp::interpreter::PsInterpreter;
use crate::model::PathSegment;
use crate::utils::Point;

impl<'a, D: Device> PsInterpreter<'a, D> {
    /// Pop a coordinate pair (y on top).
    fn pop_point(&mut self) -> Result<Point> {
        let y = self.stack.pop()?.as_num()?;
        let x = self.stack.pop()?.as_num()?;
        Ok((x, y))
    }

    /// `x y moveto` - set the current point and start a subpath.
    pub(crate) fn op_moveto(&mut self) -> Result<()> {
        let p = self.pop_point()?;
        let state = self.gstate_mut();
        state.current_point = p;
        state.path.push(PathSegment::MoveTo(p));
        Ok(())
    }

    /// `x y lineto` - append a line segment.
    pub(crate) fn op_lineto(&mut self) -> Result<()> {
        let p = self.pop_point()?;
        let state = self.gstate_mut();
        state.current_point = p;
        state.path.push(PathSegment::LineTo(p));
        Ok(())
    }

    /// `x1 y1 x2 y2 x3 y3 curveto` - append a cubic Bezier segment.
    pub(crate) fn op_curveto(&mut self) -> Result<()> {
        let p3 = self.pop_point()?;
        let p2 = self.pop_point()?;
        let p1 = self.pop_point()?;
        let state = self.gstate_mut();
        state.current_point = p3;
        state.path.push(PathSegment::CurveTo(p1, p2, p3));
        Ok(())
    }

    /// `closepath` - close the current subpath.
    pub(crate) fn op_closepath(&mut self) {
        self.gstate_mut().path.push(PathSegment::Close);
    }

    /// `newpath` - discard the current path.
    pub(crate) fn op_newpath(&mut self) {
        self.gstate_mut().path.clear();
    }

    /// `stroke` - emit a stroke event and clear the path.
    pub(crate) fn op_stroke(&mut self) {
        let state = self.gstate().clone();
        self.device.stroke_path(&state.path, &state);
        self.gstate_mut().path.clear();
    }

    /// `fill` - emit a fill event and clear the path.
    pub(crate) fn op_fill(&mut self) {
        let state = self.gstate().clone();
        self.device.fill_path(&state.path, &state);
        self.gstate_mut().path.clear();
    }

    /// `showpage` - emit the end-of-page event. The graphics stack is
    /// left untouched.
    pub(crate) fn op_showpage(&mut self) {
        self.device.show_page();
    }

    /// Appends a rectangle to the current path as a complete subpath.
    ///
    /// This is the expansion of the PDF `re` operator, which has no
    /// single PostScript counterpart here: `x y w h` become a moveto,
    /// three linetos, and a closepath.
    pub fn rect_path(&mut self) -> Result<()> {
        let h = self.stack.pop()?.as_num()?;
        let w = self.stack.pop()?.as_num()?;
        let (x, y) = self.pop_point()?;
        let state = self.gstate_mut();
        state.path.push(PathSegment::MoveTo((x, y)));
        state.path.push(PathSegment::LineTo((x + w, y)));
        state.path.push(PathSegment::LineTo((x + w, y + h)));
        state.path.push(PathSegment::LineTo((x, y + h)));
        state.path.push(PathSegment::Close);
        state.current_point = (x, y);
        Ok(())
    }
}
