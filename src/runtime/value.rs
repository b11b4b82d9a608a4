// src/runtime/value.rs

use std::fmt;
use std::sync::Arc;

use super::native_registry::NativeError;
use super::object::ObjectRef;
use crate::meta::TypeRef;

/// Handler passed to event subscriptions.
pub type Callback = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;

/// A dynamically typed value flowing through an adapter.
#[derive(Clone)]
pub enum Value {
    Unit,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Arc<str>),
    List(Vec<Value>),
    /// Return value followed by `out`/`ref` results.
    Tuple(Vec<Value>),
    Object(ObjectRef),
    Callback(Callback),
}

impl Value {
    pub fn str(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }

    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Value::Callback(Arc::new(f))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Floats, and integers widened to float.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_callback(&self) -> Option<&Callback> {
        match self {
            Value::Callback(c) => Some(c),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Value::Unit => "unit",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Object(_) => "object",
            Value::Callback(_) => "callback",
        }
    }
}

/// Objects and callbacks compare by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Unit, Value::Unit) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            (Value::Callback(a), Value::Callback(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => f.write_str("()"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::List(items) => f.debug_list().entries(items).finish(),
            Value::Tuple(items) => {
                let mut t = f.debug_tuple("");
                for item in items {
                    t.field(item);
                }
                t.finish()
            }
            Value::Object(o) => write!(f, "<object {:?}>", o.ty()),
            Value::Callback(_) => f.write_str("<callback>"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::str(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<ObjectRef> for Value {
    fn from(o: ObjectRef) -> Self {
        Value::Object(o)
    }
}

/// Arguments of one forwarded call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Call {
    /// Method-level generic arguments.
    pub type_args: Vec<TypeRef>,
    pub args: Vec<Value>,
}

impl Call {
    pub fn new(args: Vec<Value>) -> Self {
        Self {
            type_args: Vec::new(),
            args,
        }
    }

    /// A call with no arguments (property reads, nullary methods).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_type_args(mut self, type_args: Vec<TypeRef>) -> Self {
        self.type_args = type_args;
        self
    }

    pub fn arg(&self, index: usize) -> Result<&Value, NativeError> {
        self.args
            .get(index)
            .ok_or_else(|| NativeError::new(format!("missing argument {index}")))
    }

    pub fn int(&self, index: usize) -> Result<i64, NativeError> {
        let value = self.arg(index)?;
        value.as_int().ok_or_else(|| mismatch(index, "int", value))
    }

    pub fn float(&self, index: usize) -> Result<f64, NativeError> {
        let value = self.arg(index)?;
        value.as_float().ok_or_else(|| mismatch(index, "float", value))
    }

    pub fn string(&self, index: usize) -> Result<&str, NativeError> {
        let value = self.arg(index)?;
        value.as_str().ok_or_else(|| mismatch(index, "string", value))
    }
}

fn mismatch(index: usize, expected: &str, found: &Value) -> NativeError {
    NativeError::new(format!(
        "argument {index}: expected {expected}, found {}",
        found.kind()
    ))
}
