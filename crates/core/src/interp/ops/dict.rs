//! Dictionary operators.
//!
//! `def` writes into the current (top) dictionary; `load` reads from
//! it. `store` and `known` address a dictionary taken from the stack
//! instead. Keys are name tokens and lose their leading slash on the
//! way in.

use crate::error::{GoyaError, Result};
use crate::interp::device::Device;
use crate::interp::interpreter::PsInterpreter;
use crate::model::Value;
use std::collections::HashMap;

impl<'a, D: Device> PsInterpreter<'a, D> {
    /// `n dict` - push a new empty dictionary. The size operand is a
    /// capacity hint and is ignored beyond validation.
    pub(crate) fn op_dict(&mut self) -> Result<()> {
        let size = self.stack.pop()?.as_int()?;
        if size < 0 {
            return Err(GoyaError::Range(format!("negative dict size: {size}")));
        }
        self.stack.push(Value::dict(HashMap::new()));
        Ok(())
    }

    /// `/key value def` - bind in the current dictionary.
    pub(crate) fn op_def(&mut self) -> Result<()> {
        let value = self.stack.pop()?;
        let key = self.stack.pop()?;
        let key = key.as_key()?.to_string();
        self.current_dict().borrow_mut().insert(key, value);
        Ok(())
    }

    /// `/key load` - fetch from the current dictionary.
    pub(crate) fn op_load(&mut self) -> Result<()> {
        let key = self.stack.pop()?;
        let key = key.as_key()?;
        let value = self
            .current_dict()
            .borrow()
            .get(key)
            .cloned()
            .ok_or_else(|| GoyaError::Undefined(key.to_string()))?;
        self.stack.push(value);
        Ok(())
    }

    /// `dict /key value store` - bind in the named dictionary.
    pub(crate) fn op_store(&mut self) -> Result<()> {
        let value = self.stack.pop()?;
        let key = self.stack.pop()?;
        let dict = self.stack.pop()?;
        let key = key.as_key()?.to_string();
        dict.as_dict()?.borrow_mut().insert(key, value);
        Ok(())
    }

    /// `dict /key known` - membership test.
    pub(crate) fn op_known(&mut self) -> Result<()> {
        let key = self.stack.pop()?;
        let dict = self.stack.pop()?;
        let key = key.as_key()?;
        let present = dict.as_dict()?.borrow().contains_key(key);
        self.stack.push(Value::Boolean(present));
        Ok(())
    }

    /// `dict keys` - push an array of the dictionary's keys as names.
    pub(crate) fn op_keys(&mut self) -> Result<()> {
        let dict = self.stack.pop()?;
        let names: Vec<Value> = dict
            .as_dict()?
            .borrow()
            .keys()
            .map(|key| Value::Name(format!("/{key}")))
            .collect();
        self.stack.push(Value::array(names));
        Ok(())
    }
}
