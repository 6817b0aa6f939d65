use std::rc::Rc;

use promis_types::PromiseError;

use crate::foreign::Foreign;
use crate::promise::Promise;

/// Any value a promise can settle with or a handler can return.
///
/// Scalars compare by value. `Promise` and `Object` compare by identity, which
/// is what the resolution procedure's self-resolution check relies on.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Error(PromiseError),
    /// Another instance of this primitive; adopted during resolution.
    Promise(Promise),
    /// A foreign object or callable; assimilated if it exposes a callable `then`.
    Object(Rc<dyn Foreign>),
}

impl Value {
    #[must_use]
    pub fn object(object: impl Foreign + 'static) -> Self {
        Value::Object(Rc::new(object))
    }

    /// True for values the resolution procedure fulfills with directly,
    /// without consulting a `then` member.
    #[must_use]
    pub const fn is_plain(&self) -> bool {
        !matches!(self, Value::Promise(_) | Value::Object(_))
    }

    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_error(&self) -> Option<&PromiseError> {
        match self {
            Value::Error(err) => Some(err),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_promise(&self) -> Option<&Promise> {
        match self {
            Value::Promise(promise) => Some(promise),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    #[allow(clippy::float_cmp)] // same semantics as the scalar it models
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Error(a), Value::Error(b)) => a == b,
            (Value::Promise(a), Value::Promise(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<PromiseError> for Value {
    fn from(value: PromiseError) -> Self {
        Value::Error(value)
    }
}

impl From<Promise> for Value {
    fn from(value: Promise) -> Self {
        Value::Promise(value)
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Value::Undefined
    }
}
