//! Class definitions
//!
//! A definition is the single-use input to [`crate::build`]. It is moved into
//! the builder, so one definition can never seed two classes.

use crate::class::ClassRef;
use crate::defaults::{CONSTRUCTOR_KEY, INHERITED_STATICS_KEY, MIXINS_KEY, STATICS_KEY};
use crate::object::{Construct, Constructor, ObjectRef};
use crate::value::{Members, Value};
use crate::{ClassError, ClassResult};

/// Input to the class builder
#[derive(Debug, Default)]
pub struct ClassDefinition {
    pub(crate) name: Option<String>,
    pub(crate) constructor: Option<Constructor>,
    pub(crate) members: Members,
    pub(crate) statics: Members,
    /// `None` when the definition declares no inherited statics at all
    pub(crate) inherited_statics: Option<Members>,
    pub(crate) mixins: Vec<ClassRef>,
}

impl ClassDefinition {
    /// Create an empty definition
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the debug name of the class
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the per-instance constructor
    pub fn constructor<F>(mut self, f: F) -> Self
    where
        F: Fn(&ObjectRef, &[Value]) -> ClassResult<Construct> + Send + Sync + 'static,
    {
        self.constructor = Some(Constructor::new(f));
        self
    }

    /// Set an already wrapped constructor
    pub fn with_constructor(mut self, constructor: Constructor) -> Self {
        self.constructor = Some(constructor);
        self
    }

    /// Add an instance member
    pub fn member(mut self, name: impl Into<String>, value: Value) -> Self {
        self.members.insert(name.into(), value);
        self
    }

    /// Add an instance method
    pub fn method<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> ClassResult<Value> + Send + Sync + 'static,
    {
        self.member(name, Value::function(f))
    }

    /// Add several instance members
    pub fn members(mut self, members: Members) -> Self {
        self.members.extend(members);
        self
    }

    /// Add a class-local static
    pub fn static_member(mut self, name: impl Into<String>, value: Value) -> Self {
        self.statics.insert(name.into(), value);
        self
    }

    /// Add a class-local static method
    pub fn static_method<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> ClassResult<Value> + Send + Sync + 'static,
    {
        self.static_member(name, Value::function(f))
    }

    /// Add a static propagated to every subclass
    pub fn inherited_static(mut self, name: impl Into<String>, value: Value) -> Self {
        self.inherited_statics
            .get_or_insert_with(Members::default)
            .insert(name.into(), value);
        self
    }

    /// Add a static method propagated to every subclass
    pub fn inherited_static_method<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> ClassResult<Value> + Send + Sync + 'static,
    {
        self.inherited_static(name, Value::function(f))
    }

    /// Append a mixin; later mixins take precedence over earlier ones
    pub fn mixin(mut self, mixin: &ClassRef) -> Self {
        self.mixins.push(mixin.clone());
        self
    }

    /// Append several mixins in order
    pub fn mixins<'a>(mut self, mixins: impl IntoIterator<Item = &'a ClassRef>) -> Self {
        self.mixins.extend(mixins.into_iter().cloned());
        self
    }

    /// Build a definition from a dynamic record
    ///
    /// The reserved keys `constructor`, `statics`, `inheritedStatics` and
    /// `mixins` are removed from the record; everything left becomes an
    /// instance member. A record constructor returning an object-like value
    /// substitutes that value for the new instance.
    pub fn from_record(mut record: Members) -> ClassResult<Self> {
        let mut definition = ClassDefinition::new();

        if let Some(value) = record.remove(CONSTRUCTOR_KEY) {
            let f = match value {
                Value::Function(f) => f,
                other => {
                    return Err(ClassError::InvalidDefinition(format!(
                        "'{}' must be a function, got {}",
                        CONSTRUCTOR_KEY,
                        other.type_name()
                    )))
                }
            };
            definition.constructor = Some(Constructor::new(move |this, args| {
                let result = f.call(&Value::Object(this.clone()), args)?;
                if result.is_object_like() {
                    Ok(Construct::Replace(result))
                } else {
                    Ok(Construct::Fresh)
                }
            }));
        }

        if let Some(value) = record.remove(STATICS_KEY) {
            definition.statics = expect_record(STATICS_KEY, value)?;
        }

        if let Some(value) = record.remove(INHERITED_STATICS_KEY) {
            definition.inherited_statics = Some(expect_record(INHERITED_STATICS_KEY, value)?);
        }

        if let Some(value) = record.remove(MIXINS_KEY) {
            let Some(items) = value.as_list() else {
                return Err(ClassError::InvalidDefinition(format!(
                    "'{}' must be a list, got {}",
                    MIXINS_KEY,
                    value.type_name()
                )));
            };
            for item in items {
                match item {
                    Value::Class(class) => definition.mixins.push(class.clone()),
                    other => {
                        return Err(ClassError::InvalidDefinition(format!(
                            "'{}' entries must be classes, got {}",
                            MIXINS_KEY,
                            other.type_name()
                        )))
                    }
                }
            }
        }

        definition.members = record;
        Ok(definition)
    }
}

fn expect_record(key: &str, value: Value) -> ClassResult<Members> {
    match value {
        Value::Record(members) => Ok((*members).clone()),
        other => Err(ClassError::InvalidDefinition(format!(
            "'{}' must be a record, got {}",
            key,
            other.type_name()
        ))),
    }
}
