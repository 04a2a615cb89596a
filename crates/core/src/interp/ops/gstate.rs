//! Graphics state and transform operators.
//!
//! Transforms pre-multiply the CTM by the operator matrix: the new
//! mapping applies the operator first, then the previous CTM.

use crate::error::{GoyaError, Result};
use crate::interp::device::Device;
use crate::interp::interpreter::PsInterpreter;
use crate::utils::{mult_matrix, Matrix};

impl<'a, D: Device> PsInterpreter<'a, D> {
    /// `gsave` - push a deep copy of the current state.
    pub(crate) fn op_gsave(&mut self) {
        let copy = self.gstate().copy();
        self.gstack.push(copy);
    }

    /// `grestore` - pop the current state. The initial state can not
    /// be removed.
    pub(crate) fn op_grestore(&mut self) -> Result<()> {
        if self.gstack.len() <= 1 {
            return Err(GoyaError::StackUnderflow("graphics state stack"));
        }
        self.gstack.pop();
        Ok(())
    }

    /// `r g b setrgbcolor`
    pub(crate) fn op_setrgbcolor(&mut self) -> Result<()> {
        let b = self.stack.pop()?.as_num()?;
        let g = self.stack.pop()?.as_num()?;
        let r = self.stack.pop()?.as_num()?;
        self.gstate_mut().rgb = (r, g, b);
        Ok(())
    }

    /// `gray setgray` - achromatic shorthand for setrgbcolor.
    pub(crate) fn op_setgray(&mut self) -> Result<()> {
        let gray = self.stack.pop()?.as_num()?;
        self.gstate_mut().rgb = (gray, gray, gray);
        Ok(())
    }

    /// `width setlinewidth`
    pub(crate) fn op_setlinewidth(&mut self) -> Result<()> {
        let width = self.stack.pop()?.as_num()?;
        self.gstate_mut().line_width = width;
        Ok(())
    }

    fn apply_transform(&mut self, m: Matrix) {
        let state = self.gstate_mut();
        state.ctm = mult_matrix(m, state.ctm);
    }

    /// `tx ty translate`
    pub(crate) fn op_translate(&mut self) -> Result<()> {
        let ty = self.stack.pop()?.as_num()?;
        let tx = self.stack.pop()?.as_num()?;
        self.apply_transform([1.0, 0.0, 0.0, 1.0, tx, ty]);
        Ok(())
    }

    /// `sx sy scale`
    pub(crate) fn op_scale(&mut self) -> Result<()> {
        let sy = self.stack.pop()?.as_num()?;
        let sx = self.stack.pop()?.as_num()?;
        self.apply_transform([sx, 0.0, 0.0, sy, 0.0, 0.0]);
        Ok(())
    }

    /// `angle rotate` - angle in degrees.
    pub(crate) fn op_rotate(&mut self) -> Result<()> {
        let degrees = self.stack.pop()?.as_num()?;
        let radians = degrees.to_radians();
        let (sin, cos) = radians.sin_cos();
        self.apply_transform([cos, -sin, sin, cos, 0.0, 0.0]);
        Ok(())
    }

    /// Pre-multiply the CTM by a matrix given as six loose operands,
    /// the shape the PDF `cm` operator uses (`a b c d e f`, f on top).
    pub fn concat_from_operands(&mut self) -> Result<()> {
        let f = self.stack.pop()?.as_num()?;
        let e = self.stack.pop()?.as_num()?;
        let d = self.stack.pop()?.as_num()?;
        let c = self.stack.pop()?.as_num()?;
        let b = self.stack.pop()?.as_num()?;
        let a = self.stack.pop()?.as_num()?;
        self.apply_transform([a, b, c, d, e, f]);
        Ok(())
    }

    /// `[a b c d e f] concat` - pre-multiply the CTM by an arbitrary
    /// matrix.
    pub(crate) fn op_concat(&mut self) -> Result<()> {
        let array = self.stack.pop()?;
        let elements = array.as_array()?.borrow().clone();
        if elements.len() != 6 {
            return Err(GoyaError::Range(format!(
                "matrix needs 6 elements, got {}",
                elements.len()
            )));
        }
        let mut m = [0.0; 6];
        for (slot, value) in m.iter_mut().zip(elements.iter()) {
            *slot = value.as_num()?;
        }
        self.apply_transform(m);
        Ok(())
    }
}
