//! Class entities
//!
//! A class is at once an instance factory, a namespace of statics and a node
//! in a singly rooted ancestor chain. Member tables are resolved when the
//! class is built: the superclass table is copied, then the definition and
//! mixins are laid over it. A class never observes later changes made to
//! its superclass.

use std::fmt;
use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::{Lazy, OnceCell};
use parking_lot::RwLock;

use crate::builder;
use crate::defaults::ROOT_CLASS_NAME;
use crate::definition::ClassDefinition;
use crate::mixin::{self, MixinId};
use crate::object::{Construct, Constructor, ObjectRef};
use crate::value::{Members, Value};
use crate::{ClassError, ClassResult};

/// Shards per mixin cache; each cache only sees queries against one class
const MIXIN_CACHE_SHARDS: usize = 4;

/// Global counter for class IDs
static NEXT_CLASS_ID: AtomicU64 = AtomicU64::new(0);

/// The universal base class
static ROOT: Lazy<ClassRef> = Lazy::new(|| {
    Class::assemble(ClassParts {
        name: Some(ROOT_CLASS_NAME.to_string()),
        superclass: None,
        constructor: None,
        members: Members::default(),
        statics: Members::default(),
        inherited_statics: None,
        mixins: Vec::new(),
    })
});

/// Unique class identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(u64);

impl ClassId {
    fn next() -> Self {
        ClassId(NEXT_CLASS_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Fully composed pieces of a class, ready to be frozen
pub(crate) struct ClassParts {
    pub name: Option<String>,
    pub superclass: Option<ClassRef>,
    /// `None` forwards construction to the superclass
    pub constructor: Option<Constructor>,
    pub members: Members,
    pub statics: Members,
    pub inherited_statics: Option<Arc<Members>>,
    pub mixins: Vec<ClassRef>,
}

/// Class entity
pub struct Class {
    id: ClassId,
    name: Option<String>,
    superclass: Option<ClassRef>,
    /// `None` forwards construction to the superclass
    constructor: Option<Constructor>,
    /// Resolved instance members (own, inherited and mixed in)
    members: RwLock<Members>,
    /// Statics visible on this class, inherited statics included
    statics: Members,
    /// Inherited statics handed down to subclasses
    inherited_statics: Option<Arc<Members>>,
    mixins: Vec<ClassRef>,
    /// Identity used when this class is the target of a mixin query
    pub(crate) mixin_id: OnceCell<MixinId>,
    /// Memoized transitive mixin lookups, keyed by mixin identity
    pub(crate) mixin_cache: DashMap<MixinId, bool>,
}

/// Shared handle to a class
#[derive(Clone)]
pub struct ClassRef(Arc<Class>);

impl Class {
    /// The universal base class every chain ends at
    pub fn root() -> ClassRef {
        ROOT.clone()
    }

    pub(crate) fn assemble(parts: ClassParts) -> ClassRef {
        ClassRef(Arc::new(Class {
            id: ClassId::next(),
            name: parts.name,
            superclass: parts.superclass,
            constructor: parts.constructor,
            members: RwLock::new(parts.members),
            statics: parts.statics,
            inherited_statics: parts.inherited_statics,
            mixins: parts.mixins,
            mixin_id: OnceCell::new(),
            mixin_cache: DashMap::with_shard_amount(MIXIN_CACHE_SHARDS),
        }))
    }

    /// Class ID
    pub fn id(&self) -> ClassId {
        self.id
    }

    /// Debug name, if one was given
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Debug name, or `anonymous`
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("anonymous")
    }

    /// Direct superclass (`None` only for the root)
    pub fn superclass(&self) -> Option<&ClassRef> {
        self.superclass.as_ref()
    }

    /// Check whether this is the universal base class
    pub fn is_root(&self) -> bool {
        self.superclass.is_none()
    }

    /// Mixins in declaration order
    pub fn mixins(&self) -> &[ClassRef] {
        &self.mixins
    }

    /// Inherited statics this class hands down to its subclasses
    pub fn inherited_statics(&self) -> Option<&Members> {
        self.inherited_statics.as_deref()
    }

    pub(crate) fn inherited_statics_arc(&self) -> Option<&Arc<Members>> {
        self.inherited_statics.as_ref()
    }

    /// All statics visible on this class
    pub fn statics(&self) -> &Members {
        &self.statics
    }

    /// Get a static member
    pub fn get_static(&self, name: &str) -> Option<Value> {
        self.statics.get(name).cloned()
    }

    /// Check whether a static member exists
    pub fn has_static(&self, name: &str) -> bool {
        self.statics.contains_key(name)
    }

    /// Get an instance member from the resolved table
    pub fn member(&self, name: &str) -> Option<Value> {
        self.members.read().get(name).cloned()
    }

    /// Check whether an instance member exists
    pub fn has_member(&self, name: &str) -> bool {
        self.members.read().contains_key(name)
    }

    /// Sorted names of all instance members
    pub fn member_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.members.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Copy of the resolved member table
    pub fn members_snapshot(&self) -> Members {
        self.members.read().clone()
    }

    /// Merge members onto the resolved table, overwriting same-named ones
    ///
    /// Subclasses built earlier keep the table they copied.
    pub fn override_members(&self, members: Members) {
        let mut table = self.members.write();
        for (name, value) in members {
            table.insert(name, value);
        }
    }

    /// Run this class's constructor against an existing instance
    ///
    /// A class without its own constructor hands `this` and the arguments
    /// to the nearest ancestor that has one. The root leaves the instance
    /// untouched.
    pub fn construct(&self, this: &ObjectRef, args: &[Value]) -> ClassResult<Construct> {
        let mut class = self;
        loop {
            if let Some(constructor) = &class.constructor {
                return constructor.call(this, args);
            }
            match class.superclass.as_deref() {
                Some(superclass) => class = superclass,
                None => return Ok(Construct::Fresh),
            }
        }
    }

    /// Check whether this class is `other` or descends from it
    pub fn is_subclass_of(&self, other: &ClassRef) -> bool {
        if self.id == other.id {
            return true;
        }

        let mut current = self.superclass.as_ref();
        while let Some(class) = current {
            if class.id == other.id {
                return true;
            }
            current = class.superclass.as_ref();
        }

        false
    }
}

impl ClassRef {
    /// Create an instance and run the constructor chain
    ///
    /// Returns the instance, or the value a constructor substituted for it.
    pub fn instantiate(&self, args: &[Value]) -> ClassResult<Value> {
        let this = ObjectRef::new(self.clone());
        match self.construct(&this, args)? {
            Construct::Fresh => Ok(Value::Object(this)),
            Construct::Replace(value) => Ok(value),
        }
    }

    /// Build a subclass of this class
    pub fn extend(&self, definition: ClassDefinition) -> ClassResult<ClassRef> {
        builder::build(Some(self), definition)
    }

    /// Check whether this class or any ancestor carries `mixin`
    pub fn has_mixin(&self, mixin: &ClassRef) -> bool {
        mixin::has_mixin(self, mixin)
    }

    /// Invoke a static with this class as the receiver
    pub fn call_static(&self, name: &str, args: &[Value]) -> ClassResult<Value> {
        match self.get_static(name) {
            Some(Value::Function(f)) => f.call(&Value::Class(self.clone()), args),
            _ => Err(ClassError::NotCallable {
                name: name.to_string(),
            }),
        }
    }

    /// This class followed by every ancestor up to the root
    pub fn ancestors(&self) -> Vec<ClassRef> {
        let mut chain = vec![self.clone()];
        let mut current = self.superclass().cloned();
        while let Some(class) = current {
            current = class.superclass().cloned();
            chain.push(class);
        }
        chain
    }

    /// Check whether two handles refer to the same class
    pub fn ptr_eq(&self, other: &ClassRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Wrap as a value
    pub fn to_value(&self) -> Value {
        Value::Class(self.clone())
    }
}

impl Deref for ClassRef {
    type Target = Class;

    fn deref(&self) -> &Class {
        &self.0
    }
}

impl Drop for Class {
    // Dropping a long chain would otherwise recurse once per ancestor.
    fn drop(&mut self) {
        let mut next = self.superclass.take();
        while let Some(ClassRef(arc)) = next {
            next = match Arc::into_inner(arc) {
                Some(mut class) => class.superclass.take(),
                None => None,
            };
        }
    }
}

impl fmt::Debug for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[class {}#{}]", self.display_name(), self.id.0)
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("superclass", &self.superclass)
            .field("mixins", &self.mixins)
            .field("statics", &self.statics.len())
            .finish()
    }
}
