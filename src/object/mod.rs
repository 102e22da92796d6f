//! Runtime value model.
//!
//! `Value` is the single container for everything the evaluator produces,
//! the same role the teacher's `interpreter::value::Value` plays
//! (`src/interpreter/value/mod.rs` in puffin), generalized here with the
//! variants spec §3 requires: a hash-key protocol, closures that capture
//! an `Environment`, an opaque `Quote` payload, a `Macro` variant, and the
//! internal `Return`/`Error` control-flow values.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::rc::Rc;

use crate::ast::{Block, Expression};

pub mod builtin;
pub mod environment;

pub use builtin::Builtin;
pub use environment::Environment;

/// A puffin-style shared, mutable handle; arrays and hashes are built once
/// from their literal and never mutated in place by this language (there is
/// no index-assignment operator in this spec), but they are still `Rc`'d so
/// that passing them around (e.g. as function arguments) is cheap.
pub type ArrayRef = Rc<RefCell<Vec<Value>>>;
pub type HashRef = Rc<RefCell<HashMap<HashKey, (Value, Value)>>>;

#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    String(String),
    Null,
    Array(ArrayRef),
    Hash(HashRef),
    Function {
        parameters: Vec<String>,
        body: Block,
        env: Rc<RefCell<Environment>>,
    },
    Builtin(Builtin),
    /// An AST subtree captured at quote time (spec §3 invariant 5: opaque
    /// to most operators).
    Quote(Expression),
    Macro {
        parameters: Vec<String>,
        body: Block,
        env: Rc<RefCell<Environment>>,
    },
    /// Internal control-flow marker for `return`. Never observable outside
    /// the evaluator: unwrapped at every function-call boundary and at the
    /// top of `Program` evaluation (spec §3 invariant 2).
    Return(Box<Value>),
    Error(String),
}

/// The (type-tag, content-hash) pair of spec §3's hash-key protocol.
/// Deriving `Hash`/`Eq` is the idiomatic Rust rendering of that protocol:
/// two keys collide exactly when both their tag and content agree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HashKey {
    Integer(i64),
    Boolean(bool),
    String(String),
}

impl Value {
    /// Name used in error messages ("type mismatch: Integer + Boolean",
    /// "unknown operator: -Boolean", "index op not supported: Function").
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "Integer",
            Value::Boolean(_) => "Boolean",
            Value::String(_) => "String",
            Value::Null => "Null",
            Value::Array(_) => "Array",
            Value::Hash(_) => "Hash",
            Value::Function { .. } => "Function",
            Value::Builtin(_) => "Builtin",
            Value::Quote(_) => "Quote",
            Value::Macro { .. } => "Macro",
            Value::Return(_) => "Return",
            Value::Error(_) => "Error",
        }
    }

    /// A value is hashable iff it is Integer, Boolean, or String (spec §3).
    pub fn hash_key(&self) -> Option<HashKey> {
        match self {
            Value::Integer(i) => Some(HashKey::Integer(*i)),
            Value::Boolean(b) => Some(HashKey::Boolean(*b)),
            Value::String(s) => Some(HashKey::String(s.clone())),
            _ => None,
        }
    }

    /// Spec §4.1.3: Null is false, Boolean carries its own value, every
    /// other value (including Integer 0) is false. This is deliberately not
    /// "truthy unless null or false" — see SPEC_FULL.md §C.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Boolean(b) => *b,
            _ => false,
        }
    }

    pub fn error(msg: impl Into<String>) -> Value {
        Value::Error(msg.into())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }
}

/// Equality used by the `==`/`!=` infix operators (spec §4.1.2): same
/// variant and, for the primitive variants, the same contents; for every
/// other pair of equal-variant values, the canonical printed form. This
/// also backs `assert_eq!` in tests, since for the variants tests compare
/// it agrees with structural equality.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Null, Value::Null) => true,
            _ if std::mem::discriminant(self) == std::mem::discriminant(other) => {
                self.to_string() == other.to_string()
            }
            _ => false,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::String(s) => write!(f, "{}", s),
            Value::Null => write!(f, "null"),
            Value::Array(elements) => {
                let rendered: Vec<String> =
                    elements.borrow().iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
            Value::Hash(pairs) => {
                let rendered: Vec<String> = pairs
                    .borrow()
                    .values()
                    .map(|(k, v)| format!("{}: {}", k, v))
                    .collect();
                write!(f, "{{{}}}", rendered.join(", "))
            }
            Value::Function { parameters, .. } => {
                write!(f, "fn({}) {{ ... }}", parameters.join(", "))
            }
            Value::Builtin(b) => write!(f, "builtin function {}", b.name),
            Value::Quote(expr) => write!(f, "QUOTE({:?})", expr),
            Value::Macro { parameters, .. } => {
                write!(f, "macro({}) {{ ... }}", parameters.join(", "))
            }
            Value::Return(inner) => write!(f, "{}", inner),
            Value::Error(msg) => write!(f, "ERROR: {}", msg),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}
