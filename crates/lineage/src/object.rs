//! Instances and constructors

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::class::ClassRef;
use crate::value::{Members, Value};
use crate::{ClassError, ClassResult};

/// Outcome of running a constructor against a fresh instance
#[derive(Debug, Clone, PartialEq)]
pub enum Construct {
    /// Instantiation yields the instance the constructor ran against
    Fresh,
    /// Instantiation yields this value instead of the instance
    Replace(Value),
}

/// Signature of a constructor: `(this, args) -> outcome`
pub type NativeConstructor = dyn Fn(&ObjectRef, &[Value]) -> ClassResult<Construct> + Send + Sync;

/// Per-instance initializer attached to a class
#[derive(Clone)]
pub struct Constructor {
    inner: Arc<NativeConstructor>,
}

impl Constructor {
    /// Wrap a closure as a constructor
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&ObjectRef, &[Value]) -> ClassResult<Construct> + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// Run against an instance
    pub fn call(&self, this: &ObjectRef, args: &[Value]) -> ClassResult<Construct> {
        (self.inner)(this, args)
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "constructor@{:p}", Arc::as_ptr(&self.inner) as *const ())
    }
}

/// Class instance
///
/// Own fields shadow the members resolved on the runtime class.
pub struct Object {
    class: ClassRef,
    fields: RwLock<Members>,
}

/// Shared handle to an instance
#[derive(Clone)]
pub struct ObjectRef(Arc<Object>);

impl ObjectRef {
    /// Allocate an empty instance of `class`
    pub(crate) fn new(class: ClassRef) -> Self {
        ObjectRef(Arc::new(Object {
            class,
            fields: RwLock::new(Members::default()),
        }))
    }

    /// Runtime class of this instance
    pub fn class(&self) -> &ClassRef {
        &self.0.class
    }

    /// Look up a property: own fields first, then class members
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.0.fields.read().get(name) {
            return Some(value.clone());
        }
        self.0.class.member(name)
    }

    /// Look up an own field only
    pub fn get_own(&self, name: &str) -> Option<Value> {
        self.0.fields.read().get(name).cloned()
    }

    /// Set an own field
    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.0.fields.write().insert(name.into(), value);
    }

    /// Check whether a property is visible on this instance
    pub fn has(&self, name: &str) -> bool {
        self.0.fields.read().contains_key(name) || self.0.class.has_member(name)
    }

    /// Invoke a method with this instance as the receiver
    pub fn call(&self, name: &str, args: &[Value]) -> ClassResult<Value> {
        match self.get(name) {
            Some(Value::Function(f)) => f.call(&Value::Object(self.clone()), args),
            _ => Err(ClassError::NotCallable {
                name: name.to_string(),
            }),
        }
    }

    /// Copy members onto this instance, overwriting same-named fields
    pub fn override_members(&self, members: Members) {
        let mut fields = self.0.fields.write();
        for (name, value) in members {
            fields.insert(name, value);
        }
    }

    /// Check whether the runtime class carries `mixin`
    pub fn has_mixin(&self, mixin: &ClassRef) -> bool {
        self.0.class.has_mixin(mixin)
    }

    /// Check whether the runtime class is `class` or descends from it
    pub fn is_instance_of(&self, class: &ClassRef) -> bool {
        self.0.class.is_subclass_of(class)
    }

    /// Check whether two handles refer to the same instance
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Wrap as a value
    pub fn to_value(&self) -> Value {
        Value::Object(self.clone())
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[object {}]", self.0.class.display_name())
    }
}
