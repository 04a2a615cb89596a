//! Array operators.
//!
//! Arrays have identity semantics: `put` writes through the shared
//! handle, and every holder of the same array observes the update.
//! After writing, `put` pushes the array back onto the stack.

use crate::error::{GoyaError, Result};
use crate::interp::device::Device;
use crate::interp::interpreter::{expect_procedure, PsInterpreter};
use crate::model::value::string_contents;
use crate::model::Value;
use std::rc::Rc;

impl<'a, D: Device> PsInterpreter<'a, D> {
    /// `n array` - push a new array of n null elements.
    pub(crate) fn op_array(&mut self) -> Result<()> {
        let size = self.stack.pop()?.as_int()?;
        if size < 0 {
            return Err(GoyaError::Range(format!("negative array size: {size}")));
        }
        self.stack
            .push(Value::array(vec![Value::Null; size as usize]));
        Ok(())
    }

    /// `array index get` - fetch an element, bounds checked.
    pub(crate) fn op_get(&mut self) -> Result<()> {
        let index = self.stack.pop()?.as_int()?;
        let array = self.stack.pop()?;
        let handle = array.as_array()?;
        let elements = handle.borrow();
        if index < 0 || index as usize >= elements.len() {
            return Err(GoyaError::Range(format!(
                "array index {index} out of bounds (length {})",
                elements.len()
            )));
        }
        let element = elements[index as usize].clone();
        drop(elements);
        self.stack.push(element);
        Ok(())
    }

    /// `array index value put` - write an element in place, then push
    /// the array back on top.
    pub(crate) fn op_put(&mut self) -> Result<()> {
        let value = self.stack.pop()?;
        let index = self.stack.pop()?.as_int()?;
        let array = self.stack.pop()?;
        {
            let handle = array.as_array()?;
            let mut elements = handle.borrow_mut();
            if index < 0 || index as usize >= elements.len() {
                return Err(GoyaError::Range(format!(
                    "array index {index} out of bounds (length {})",
                    elements.len()
                )));
            }
            elements[index as usize] = value;
        }
        self.stack.push(array);
        Ok(())
    }

    /// `array length` / `string length` - element count, or character
    /// count with the enclosing parentheses stripped.
    pub(crate) fn op_length(&mut self) -> Result<()> {
        let value = self.stack.pop()?;
        let length = match &value {
            Value::Array(handle) => handle.borrow().len(),
            Value::String(token) => string_contents(token).len(),
            _ => {
                return Err(GoyaError::TypeError {
                    expected: "array or string",
                    got: value.type_name(),
                });
            }
        };
        self.stack.push(Value::Integer(length as i64));
        Ok(())
    }

    /// `array aload` - push every element in order, then the array.
    pub(crate) fn op_aload(&mut self) -> Result<()> {
        let array = self.stack.pop()?;
        let elements: Vec<Value> = array.as_array()?.borrow().clone();
        for element in elements {
            self.stack.push(element);
        }
        self.stack.push(array);
        Ok(())
    }

    /// `v1 .. vn array astore` - pop exactly the array's length of
    /// values into it, deepest value landing at index n-1, then push
    /// the array.
    pub(crate) fn op_astore(&mut self) -> Result<()> {
        let array = self.stack.pop()?;
        let len = array.as_array()?.borrow().len();
        if self.stack.len() < len {
            return Err(GoyaError::StackUnderflow("operand stack"));
        }
        {
            let handle = array.as_array()?;
            let mut elements = handle.borrow_mut();
            for i in (0..len).rev() {
                elements[i] = self.stack.pop()?;
            }
        }
        self.stack.push(array);
        Ok(())
    }

    /// `array proc forall` - run the procedure once per element,
    /// left to right, with the element pushed first.
    pub(crate) fn op_forall(&mut self) -> Result<()> {
        let proc = self.stack.pop()?;
        let body = Rc::clone(expect_procedure(&proc)?);
        let array = self.stack.pop()?;
        // Iterate over a snapshot: the body may mutate the array.
        let elements: Vec<Value> = array.as_array()?.borrow().clone();
        for element in elements {
            self.stack.push(element);
            self.run_procedure(&body)?;
        }
        Ok(())
    }
}
