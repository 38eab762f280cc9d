//! Dynamic value representation
//!
//! Class definitions, statics and members hold arbitrary host values. Values
//! are cheap to clone: everything larger than a scalar sits behind an `Arc`.
//!
//! # Equality
//!
//! ```text
//! Undefined, Null, Bool, Number, String   compared by content
//! List, Record, Function, Class, Object   compared by identity
//! ```
//!
//! Identity equality is what lets callers check that a static observed on a
//! subclass is the very function declared on an ancestor.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::class::ClassRef;
use crate::object::ObjectRef;
use crate::ClassResult;

/// Name to value mapping used for members, statics and records
pub type Members = FxHashMap<String, Value>;

/// Signature of a native callable: `(this, args) -> result`
pub type NativeFn = dyn Fn(&Value, &[Value]) -> ClassResult<Value> + Send + Sync;

/// Shareable callable value
#[derive(Clone)]
pub struct Function {
    inner: Arc<NativeFn>,
}

impl Function {
    /// Wrap a closure as a callable value
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> ClassResult<Value> + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// Invoke with an explicit receiver
    pub fn call(&self, this: &Value, args: &[Value]) -> ClassResult<Value> {
        (self.inner)(this, args)
    }

    /// Check whether two handles refer to the same callable
    pub fn ptr_eq(&self, other: &Function) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.inner) as *const (),
            Arc::as_ptr(&other.inner) as *const (),
        )
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "function@{:p}", Arc::as_ptr(&self.inner) as *const ())
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

/// Dynamic value
#[derive(Clone, Default)]
pub enum Value {
    /// Absent value
    #[default]
    Undefined,
    /// Explicit null
    Null,
    /// Boolean
    Bool(bool),
    /// Double precision number
    Number(f64),
    /// Immutable string
    String(Arc<str>),
    /// Immutable list
    List(Arc<[Value]>),
    /// Immutable record
    Record(Arc<Members>),
    /// Callable
    Function(Function),
    /// Class entity
    Class(ClassRef),
    /// Class instance
    Object(ObjectRef),
}

impl Value {
    /// Create a function value from a closure
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> ClassResult<Value> + Send + Sync + 'static,
    {
        Value::Function(Function::new(f))
    }

    /// Create a string value
    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Value::String(s.into())
    }

    /// Create a list value
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(items.into())
    }

    /// Create a record value
    pub fn record(members: Members) -> Self {
        Value::Record(Arc::new(members))
    }

    /// Check for `Undefined`
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Check for `Null`
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check whether this value is object-shaped (not a primitive)
    pub fn is_object_like(&self) -> bool {
        matches!(
            self,
            Value::List(_) | Value::Record(_) | Value::Function(_) | Value::Class(_) | Value::Object(_)
        )
    }

    /// Check whether this value can be called
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    /// Extract boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extract string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    /// Extract list items
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items.as_ref()),
            _ => None,
        }
    }

    /// Extract record members
    pub fn as_record(&self) -> Option<&Members> {
        match self {
            Value::Record(members) => Some(members.as_ref()),
            _ => None,
        }
    }

    /// Extract callable
    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Extract class handle
    pub fn as_class(&self) -> Option<&ClassRef> {
        match self {
            Value::Class(c) => Some(c),
            _ => None,
        }
    }

    /// Extract instance handle
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Get type name for diagnostics
    pub const fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Record(_) => "record",
            Value::Function(_) => "function",
            Value::Class(_) => "class",
            Value::Object(_) => "object",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => Arc::ptr_eq(a, b),
            (Value::Record(a), Value::Record(b)) => Arc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Class(a), Value::Class(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "bool({})", b),
            Value::Number(n) => write!(f, "number({})", n),
            Value::String(s) => write!(f, "{:?}", s),
            Value::List(items) => f.debug_list().entries(items.iter()).finish(),
            Value::Record(members) => write!(f, "record({} keys)", members.len()),
            Value::Function(func) => write!(f, "{:?}", func),
            Value::Class(class) => write!(f, "{:?}", class),
            Value::Object(obj) => write!(f, "{:?}", obj),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s.into())
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Value::Function(f)
    }
}

impl From<ClassRef> for Value {
    fn from(c: ClassRef) -> Self {
        Value::Class(c)
    }
}

impl From<ObjectRef> for Value {
    fn from(o: ObjectRef) -> Self {
        Value::Object(o)
    }
}
