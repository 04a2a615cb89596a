//! The PostScript tagged value.
//!
//! Scalars (numbers, booleans, names, strings, procedures) behave as
//! plain values and may be copied freely. Composites (arrays and
//! dictionaries) carry identity: every copy of a handle refers to the
//! same underlying storage, and a `put` through one handle is visible
//! through all of them. Handles are reference counted; the interpreter
//! is single threaded, so `Rc<RefCell<..>>` is sufficient.

use crate::error::{GoyaError, Result};
use crate::utils::format_real;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Shared handle to the element storage of an array.
pub type ArrayHandle = Rc<RefCell<Vec<Value>>>;

/// Shared handle to the entry storage of a dictionary.
pub type DictHandle = Rc<RefCell<HashMap<String, Value>>>;

/// The token list of a procedure body, replayed on each invocation.
pub type ProcBody = Rc<Vec<String>>;

/// A PostScript object as held on the operand stack.
///
/// String and Name carry the full source token: a string keeps its
/// surrounding parentheses, a name keeps its leading slash. Operators
/// that need the bare text (`show`, `def`, `length`, ...) strip the
/// decoration themselves.
#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Real(f64),
    Boolean(bool),
    /// A string literal token, parentheses included.
    String(String),
    /// A literal name token, leading slash included.
    Name(String),
    Array(ArrayHandle),
    Dict(DictHandle),
    /// Raw source tokens between matched braces.
    Procedure(ProcBody),
    Null,
}

impl Value {
    /// Builds an array value from element values.
    pub fn array(elements: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(elements)))
    }

    /// Builds a dictionary value from key/value pairs.
    pub fn dict(entries: HashMap<String, Value>) -> Self {
        Value::Dict(Rc::new(RefCell::new(entries)))
    }

    /// Builds a procedure value from its raw token list.
    pub fn procedure(tokens: Vec<String>) -> Self {
        Value::Procedure(Rc::new(tokens))
    }

    /// Get type name for error messages.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::Boolean(_) => "boolean",
            Self::String(_) => "string",
            Self::Name(_) => "name",
            Self::Array(_) => "array",
            Self::Dict(_) => "dict",
            Self::Procedure(_) => "procedure",
            Self::Null => "null",
        }
    }

    /// Get as integer.
    pub fn as_int(&self) -> Result<i64> {
        match self {
            Self::Integer(n) => Ok(*n),
            _ => Err(GoyaError::TypeError {
                expected: "integer",
                got: self.type_name(),
            }),
        }
    }

    /// Get numeric value (integer or real coerced to f64).
    pub fn as_num(&self) -> Result<f64> {
        match self {
            Self::Integer(n) => Ok(*n as f64),
            Self::Real(n) => Ok(*n),
            _ => Err(GoyaError::TypeError {
                expected: "number",
                got: self.type_name(),
            }),
        }
    }

    /// Get as boolean.
    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Self::Boolean(b) => Ok(*b),
            _ => Err(GoyaError::TypeError {
                expected: "boolean",
                got: self.type_name(),
            }),
        }
    }

    /// Get the array handle.
    pub fn as_array(&self) -> Result<&ArrayHandle> {
        match self {
            Self::Array(handle) => Ok(handle),
            _ => Err(GoyaError::TypeError {
                expected: "array",
                got: self.type_name(),
            }),
        }
    }

    /// Get the dictionary handle.
    pub fn as_dict(&self) -> Result<&DictHandle> {
        match self {
            Self::Dict(handle) => Ok(handle),
            _ => Err(GoyaError::TypeError {
                expected: "dict",
                got: self.type_name(),
            }),
        }
    }

    /// Get the procedure body.
    pub fn as_procedure(&self) -> Result<&ProcBody> {
        match self {
            Self::Procedure(body) => Ok(body),
            _ => Err(GoyaError::TypeError {
                expected: "procedure",
                got: self.type_name(),
            }),
        }
    }

    /// The bare key text of a name token: `/foo` -> `foo`.
    ///
    /// `def` and friends accept only names as keys.
    pub fn as_key(&self) -> Result<&str> {
        match self {
            Self::Name(tok) => Ok(tok.strip_prefix('/').unwrap_or(tok)),
            _ => Err(GoyaError::TypeError {
                expected: "name",
                got: self.type_name(),
            }),
        }
    }

    /// Condition value for `if`/`ifelse`: false, zero, and 0.0 are
    /// falsy; every other value is truthy.
    pub fn truthy(&self) -> bool {
        match self {
            Self::Boolean(b) => *b,
            Self::Integer(n) => *n != 0,
            Self::Real(n) => *n != 0.0,
            _ => true,
        }
    }

    /// Tag-strict equality as performed by the `eq` operator.
    ///
    /// Values of different tags never compare equal, including mixed
    /// integer/real pairs. Composites compare false even against
    /// themselves.
    pub fn eq_value(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Real(a), Self::Real(b)) => a == b,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Name(a), Self::Name(b)) => a == b,
            _ => false,
        }
    }

    /// True when two values are the same object, not merely equal.
    /// Scalars compare by value; composites compare by handle.
    pub fn is_same_object(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Array(a), Self::Array(b)) => Rc::ptr_eq(a, b),
            (Self::Dict(a), Self::Dict(b)) => Rc::ptr_eq(a, b),
            (Self::Procedure(a), Self::Procedure(b)) => Rc::ptr_eq(a, b),
            _ => self.eq_value(other),
        }
    }
}

/// Strips one enclosing parenthesis pair from a string token.
///
/// `(Hello)` -> `Hello`; tokens without the decoration pass through.
pub fn string_contents(token: &str) -> &str {
    if token.len() >= 2 && token.starts_with('(') && token.ends_with(')') {
        &token[1..token.len() - 1]
    } else {
        token
    }
}

/// The two numeric operands of an arithmetic operator, after the
/// promotion rule has been applied.
///
/// Two integers stay integral; any real operand promotes both sides
/// to f64. This is the single place coercion happens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericPair {
    Ints(i64, i64),
    Reals(f64, f64),
}

impl NumericPair {
    /// Applies the promotion rule to two operands.
    pub fn promote(a: &Value, b: &Value) -> Result<Self> {
        match (a, b) {
            (Value::Integer(a), Value::Integer(b)) => Ok(Self::Ints(*a, *b)),
            _ => Ok(Self::Reals(a.as_num()?, b.as_num()?)),
        }
    }
}

impl fmt::Display for Value {
    /// The printable form used by `show` for non-strings, the `stack`
    /// dump, and the console device.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Real(n) => write!(f, "{}", format_real(*n)),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::String(tok) | Self::Name(tok) => write!(f, "{tok}"),
            Self::Array(handle) => {
                write!(f, "[")?;
                for (i, elem) in handle.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{elem}")?;
                }
                write!(f, "]")
            }
            Self::Dict(handle) => {
                write!(f, "<<")?;
                for (key, value) in handle.borrow().iter() {
                    write!(f, " /{key} {value}")?;
                }
                write!(f, " >>")
            }
            Self::Procedure(body) => {
                write!(f, "{{")?;
                for (i, tok) in body.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{tok}")?;
                }
                write!(f, "}}")
            }
            Self::Null => write!(f, "null"),
        }
    }
}
