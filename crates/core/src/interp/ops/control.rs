//! Control-flow operators.
//!
//! Bodies are procedure values; replaying one executes its stored
//! tokens in the caller's interpreter, so name resolution and stack
//! effects happen in the caller's context. An iteration's body runs
//! to completion before the next iteration begins.

use crate::error::{GoyaError, Result};
use crate::interp::device::Device;
use crate::interp::interpreter::{expect_procedure, PsInterpreter};
use crate::model::Value;
use std::rc::Rc;

impl<'a, D: Device> PsInterpreter<'a, D> {
    /// `cond proc if` - run the body when the condition is truthy
    /// (false, 0, and 0.0 are falsy; any other value is truthy).
    pub(crate) fn op_if(&mut self) -> Result<()> {
        let proc = self.stack.pop()?;
        let body = Rc::clone(expect_procedure(&proc)?);
        let cond = self.stack.pop()?;
        if cond.truthy() {
            self.run_procedure(&body)?;
        }
        Ok(())
    }

    /// `cond then else ifelse` - run one of the two bodies.
    pub(crate) fn op_ifelse(&mut self) -> Result<()> {
        let else_proc = self.stack.pop()?;
        let else_body = Rc::clone(expect_procedure(&else_proc)?);
        let then_proc = self.stack.pop()?;
        let then_body = Rc::clone(expect_procedure(&then_proc)?);
        let cond = self.stack.pop()?;
        if cond.truthy() {
            self.run_procedure(&then_body)
        } else {
            self.run_procedure(&else_body)
        }
    }

    /// `count proc repeat` - run the body count times.
    pub(crate) fn op_repeat(&mut self) -> Result<()> {
        let proc = self.stack.pop()?;
        let body = Rc::clone(expect_procedure(&proc)?);
        let count = self.stack.pop()?.as_int()?;
        if count < 0 {
            return Err(GoyaError::Range(format!("negative repeat count: {count}")));
        }
        for _ in 0..count {
            self.run_procedure(&body)?;
        }
        Ok(())
    }

    /// `start end step proc for` - iterate from start towards end in
    /// steps, pushing the loop variable before each run of the body.
    pub(crate) fn op_for(&mut self) -> Result<()> {
        let proc = self.stack.pop()?;
        let body = Rc::clone(expect_procedure(&proc)?);
        let step = self.stack.pop()?.as_int()?;
        let end = self.stack.pop()?.as_int()?;
        let start = self.stack.pop()?.as_int()?;
        if step == 0 {
            return Err(GoyaError::Range("zero for step".to_string()));
        }

        let mut i = start;
        loop {
            if step > 0 {
                if i > end {
                    break;
                }
            } else if i < end {
                break;
            }
            self.stack.push(Value::Integer(i));
            self.run_procedure(&body)?;
            i += step;
        }
        Ok(())
    }

    /// `proc exec` - run a procedure taken from the stack.
    pub(crate) fn op_exec(&mut self) -> Result<()> {
        let proc = self.stack.pop()?;
        let body = Rc::clone(expect_procedure(&proc)?);
        self.run_procedure(&body)
    }
}
