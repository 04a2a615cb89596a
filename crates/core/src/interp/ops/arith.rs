//! Arithmetic and comparison operators.
//!
//! All four arithmetic operators follow the promotion rule: two
//! integers produce an integer, any real operand promotes the
//! computation to f64. `div` additionally truncates for two integers.
//!
//! `eq`/`ne` accept any two values but compare tag-strictly; the
//! ordering comparisons require two numerics.

use crate::error::{GoyaError, Result};
use crate::interp::device::Device;
use crate::interp::interpreter::PsInterpreter;
use crate::model::{NumericPair, Value};

impl<'a, D: Device> PsInterpreter<'a, D> {
    pub(crate) fn op_add(&mut self) -> Result<()> {
        let b = self.stack.pop()?;
        let a = self.stack.pop()?;
        let result = match NumericPair::promote(&a, &b)? {
            NumericPair::Ints(a, b) => Value::Integer(a.wrapping_add(b)),
            NumericPair::Reals(a, b) => Value::Real(a + b),
        };
        self.stack.push(result);
        Ok(())
    }

    pub(crate) fn op_sub(&mut self) -> Result<()> {
        let b = self.stack.pop()?;
        let a = self.stack.pop()?;
        let result = match NumericPair::promote(&a, &b)? {
            NumericPair::Ints(a, b) => Value::Integer(a.wrapping_sub(b)),
            NumericPair::Reals(a, b) => Value::Real(a - b),
        };
        self.stack.push(result);
        Ok(())
    }

    pub(crate) fn op_mul(&mut self) -> Result<()> {
        let b = self.stack.pop()?;
        let a = self.stack.pop()?;
        let result = match NumericPair::promote(&a, &b)? {
            NumericPair::Ints(a, b) => Value::Integer(a.wrapping_mul(b)),
            NumericPair::Reals(a, b) => Value::Real(a * b),
        };
        self.stack.push(result);
        Ok(())
    }

    pub(crate) fn op_div(&mut self) -> Result<()> {
        let b = self.stack.pop()?;
        let a = self.stack.pop()?;
        if b.as_num()? == 0.0 {
            return Err(GoyaError::DivisionByZero);
        }
        let result = match NumericPair::promote(&a, &b)? {
            // Truncating integer division
            NumericPair::Ints(a, b) => Value::Integer(a.wrapping_div(b)),
            NumericPair::Reals(a, b) => Value::Real(a / b),
        };
        self.stack.push(result);
        Ok(())
    }

    pub(crate) fn op_eq(&mut self) -> Result<()> {
        let b = self.stack.pop()?;
        let a = self.stack.pop()?;
        self.stack.push(Value::Boolean(a.eq_value(&b)));
        Ok(())
    }

    pub(crate) fn op_ne(&mut self) -> Result<()> {
        self.op_eq()?;
        let result = self.stack.pop()?.as_bool()?;
        self.stack.push(Value::Boolean(!result));
        Ok(())
    }

    fn compare(&mut self, ints: fn(i64, i64) -> bool, reals: fn(f64, f64) -> bool) -> Result<()> {
        let b = self.stack.pop()?;
        let a = self.stack.pop()?;
        let result = match NumericPair::promote(&a, &b)? {
            NumericPair::Ints(a, b) => ints(a, b),
            NumericPair::Reals(a, b) => reals(a, b),
        };
        self.stack.push(Value::Boolean(result));
        Ok(())
    }

    pub(crate) fn op_lt(&mut self) -> Result<()> {
        self.compare(|a, b| a < b, |a, b| a < b)
    }

    pub(crate) fn op_le(&mut self) -> Result<()> {
        self.compare(|a, b| a <= b, |a, b| a <= b)
    }

    pub(crate) fn op_gt(&mut self) -> Result<()> {
        self.compare(|a, b| a > b, |a, b| a > b)
    }

    pub(crate) fn op_ge(&mut self) -> Result<()> {
        self.compare(|a, b| a >= b, |a, b| a >= b)
    }
}
