//! The PostScript token executor.
//!
//! `PsInterpreter` owns the operand stack, a non-empty dictionary
//! stack, and a non-empty graphics state stack, and drives an output
//! device. Tokens come from the lexer as raw strings; classification
//! happens here, at execution time, which is what gives procedures
//! their dynamic scope: a name inside a procedure body resolves
//! against the dictionary stack as it is when the procedure runs, not
//! when it was defined.

use crate::error::{GoyaError, Result};
use crate::interp::device::{Device, NoopDevice};
use crate::interp::stack::OperandStack;
use crate::model::{DictHandle, GraphicsState, ProcBody, Value};
use crate::parser::lexer;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub struct PsInterpreter<'a, D: Device> {
    /// Operand stack
    pub(crate) stack: OperandStack,
    /// Dictionary stack; the last entry is the current dictionary
    pub(crate) dict_stack: Vec<DictHandle>,
    /// Graphics state stack; the last entry is the current state
    pub(crate) gstack: Vec<GraphicsState>,
    /// Output device receiving draw events
    pub(crate) device: &'a mut D,
}

impl<'a, D: Device> PsInterpreter<'a, D> {
    /// Create an interpreter with one empty dictionary and one default
    /// graphics state.
    pub fn new(device: &'a mut D) -> Self {
        Self {
            stack: OperandStack::new(),
            dict_stack: vec![Rc::new(RefCell::new(HashMap::new()))],
            gstack: vec![GraphicsState::new()],
            device,
        }
    }

    /// Tokenize and execute a complete program.
    pub fn execute(&mut self, source: &[u8]) -> Result<()> {
        for token in lexer::tokenize(source)? {
            self.execute_token(&token)?;
        }
        Ok(())
    }

    /// The operand stack, for inspection.
    pub fn stack(&self) -> &OperandStack {
        &self.stack
    }

    /// The operand stack, mutable.
    pub fn stack_mut(&mut self) -> &mut OperandStack {
        &mut self.stack
    }

    /// The current graphics state.
    pub fn gstate(&self) -> &GraphicsState {
        self.gstack.last().expect("graphics stack is never empty")
    }

    /// The current graphics state, mutable.
    pub(crate) fn gstate_mut(&mut self) -> &mut GraphicsState {
        self.gstack
            .last_mut()
            .expect("graphics stack is never empty")
    }

    /// Depth of the graphics state stack.
    pub fn graphics_depth(&self) -> usize {
        self.gstack.len()
    }

    /// The current (top) dictionary.
    pub(crate) fn current_dict(&self) -> DictHandle {
        Rc::clone(self.dict_stack.last().expect("dict stack is never empty"))
    }

    /// Replay a procedure body through the executor.
    pub(crate) fn run_procedure(&mut self, body: &ProcBody) -> Result<()> {
        let body = Rc::clone(body);
        for token in body.iter() {
            self.execute_token(token)?;
        }
        Ok(())
    }

    /// Classify and execute one raw token.
    pub fn execute_token(&mut self, token: &str) -> Result<()> {
        if token.is_empty() {
            return Ok(());
        }

        // Registered operator
        if self.dispatch_operator(token)? {
            return Ok(());
        }

        // Literal name: pushed with its slash intact
        if token.len() > 1 && token.starts_with('/') {
            self.stack.push(Value::Name(token.to_string()));
            return Ok(());
        }

        // Defined name in the current dictionary: procedures run,
        // other values push a copy of their handle
        let bound = self.current_dict().borrow().get(token).cloned();
        if let Some(value) = bound {
            if let Value::Procedure(body) = &value {
                return self.run_procedure(body);
            }
            self.stack.push(value);
            return Ok(());
        }

        // Numbers
        if token.contains('.') {
            if let Ok(value) = token.parse::<f64>() {
                self.stack.push(Value::Real(value));
                return Ok(());
            }
        } else if let Ok(value) = token.parse::<i64>() {
            self.stack.push(Value::Integer(value));
            return Ok(());
        }

        // Composite literals, carried by the lexer as single tokens
        if token.len() >= 2 && token.starts_with('(') && token.ends_with(')') {
            self.stack.push(Value::String(token.to_string()));
            return Ok(());
        }
        if token.len() >= 2 && token.starts_with('[') && token.ends_with(']') {
            let value = Self::eval_array_literal(&token[1..token.len() - 1])?;
            self.stack.push(value);
            return Ok(());
        }
        if token.len() >= 4 && token.starts_with("<<") && token.ends_with(">>") {
            let value = Self::eval_dict_literal(&token[2..token.len() - 2])?;
            self.stack.push(value);
            return Ok(());
        }
        if token.len() >= 2 && token.starts_with('{') && token.ends_with('}') {
            let body = lexer::tokenize(token[1..token.len() - 1].as_bytes())?;
            self.stack.push(Value::procedure(body));
            return Ok(());
        }

        // Booleans
        if token == "true" {
            self.stack.push(Value::Boolean(true));
            return Ok(());
        }
        if token == "false" {
            self.stack.push(Value::Boolean(false));
            return Ok(());
        }

        eprintln!("warning: unknown token '{token}' - treating as literal string");
        self.stack.push(Value::String(token.to_string()));
        Ok(())
    }

    /// Evaluate one element token of a composite literal in a fresh
    /// sub-executor and return the value it leaves on top.
    fn eval_element(token: &str) -> Result<Option<Value>> {
        let mut sink = NoopDevice;
        let mut sub = PsInterpreter::new(&mut sink);
        sub.execute_token(token)?;
        Ok(sub.stack.pop().ok())
    }

    /// Evaluate the interior of an `[...]` literal into an array value.
    fn eval_array_literal(interior: &str) -> Result<Value> {
        let mut elements = Vec::new();
        for token in lexer::tokenize(interior.as_bytes())? {
            if let Some(value) = Self::eval_element(&token)? {
                elements.push(value);
            }
        }
        Ok(Value::array(elements))
    }

    /// Evaluate the interior of a `<<...>>` literal into a dictionary
    /// value: alternating name/value pairs, keys losing their slash.
    fn eval_dict_literal(interior: &str) -> Result<Value> {
        let tokens = lexer::tokenize(interior.as_bytes())?;
        let mut entries = HashMap::new();

        for pair in tokens.chunks_exact(2) {
            let key = pair[0].strip_prefix('/').unwrap_or(&pair[0]).to_string();
            if let Some(value) = Self::eval_element(&pair[1])? {
                entries.insert(key, value);
            }
        }

        Ok(Value::dict(entries))
    }

    /// Invoke a library operator by name. Returns false when the name
    /// is not an operator, so classification can continue.
    fn dispatch_operator(&mut self, name: &str) -> Result<bool> {
        match name {
            // Arithmetic and comparison
            "add" => self.op_add()?,
            "sub" => self.op_sub()?,
            "mul" => self.op_mul()?,
            "div" => self.op_div()?,
            "eq" => self.op_eq()?,
            "ne" => self.op_ne()?,
            "lt" => self.op_lt()?,
            "le" => self.op_le()?,
            "gt" => self.op_gt()?,
            "ge" => self.op_ge()?,

            // Stack and output
            "dup" => self.stack.dup()?,
            "pop" => {
                self.stack.pop()?;
            }
            "exch" => self.stack.exch()?,
            "clear" => self.stack.clear(),
            "stack" => self.op_stack(),
            "show" => self.op_show()?,

            // Arrays
            "array" => self.op_array()?,
            "get" => self.op_get()?,
            "put" => self.op_put()?,
            "length" => self.op_length()?,
            "aload" => self.op_aload()?,
            "astore" => self.op_astore()?,
            "forall" => self.op_forall()?,

            // Dictionaries
            "dict" => self.op_dict()?,
            "def" => self.op_def()?,
            "load" => self.op_load()?,
            "store" => self.op_store()?,
            "known" => self.op_known()?,
            "keys" => self.op_keys()?,

            // Control flow
            "if" => self.op_if()?,
            "ifelse" => self.op_ifelse()?,
            "repeat" => self.op_repeat()?,
            "for" => self.op_for()?,
            "exec" => self.op_exec()?,

            // Path construction and painting
            "moveto" => self.op_moveto()?,
            "lineto" => self.op_lineto()?,
            "curveto" => self.op_curveto()?,
            "closepath" => self.op_closepath(),
            "newpath" => self.op_newpath(),
            "stroke" => self.op_stroke(),
            "fill" => self.op_fill(),
            "showpage" => self.op_showpage(),

            // Graphics state and transforms
            "gsave" => self.op_gsave(),
            "grestore" => self.op_grestore()?,
            "setrgbcolor" => self.op_setrgbcolor()?,
            "setgray" => self.op_setgray()?,
            "setlinewidth" => self.op_setlinewidth()?,
            "translate" => self.op_translate()?,
            "scale" => self.op_scale()?,
            "rotate" => self.op_rotate()?,
            "concat" => self.op_concat()?,

            _ => return Ok(false),
        }
        Ok(true)
    }
}

/// Type check used by control-flow operators for their bodies.
pub(crate) fn expect_procedure(value: &Value) -> Result<&ProcBody> {
    match value {
        Value::Procedure(body) => Ok(body),
        _ => Err(GoyaError::TypeError {
            expected: "procedure",
            got: value.type_name(),
        }),
    }
}
