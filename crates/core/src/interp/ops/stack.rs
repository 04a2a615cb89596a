//! Stack manipulation and output operators.
//!
//! dup/pop/exch/clear are handled directly by `OperandStack`; this
//! file carries the two that need more than the stack itself.

use crate::error::Result;
use crate::interp::device::Device;
use crate::interp::interpreter::PsInterpreter;
use crate::model::value::string_contents;
use crate::model::Value;

impl<'a, D: Device> PsInterpreter<'a, D> {
    /// Dump the operand stack to stderr, bottom to top.
    pub(crate) fn op_stack(&self) {
        eprintln!("=== operand stack ({} values) ===", self.stack.len());
        for (i, value) in self.stack.iter().enumerate() {
            eprintln!("  {i}: {value}");
        }
    }

    /// Emit one value on the device: a string literal loses its
    /// enclosing parentheses, anything else prints its display form.
    pub(crate) fn op_show(&mut self) -> Result<()> {
        let value = self.stack.pop()?;
        match &value {
            Value::String(token) => {
                let text = string_contents(token).as_bytes().to_vec();
                self.device.show_text(&text);
            }
            other => {
                let text = other.to_string();
                self.device.show_text(text.as_bytes());
            }
        }
        Ok(())
    }
}
