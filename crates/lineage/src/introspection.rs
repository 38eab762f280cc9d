//! Class introspection
//!
//! Ancestry and membership queries over values and classes.

use crate::class::ClassRef;
use crate::value::Value;
use crate::{ClassError, ClassResult};

/// Check if `sub` is `sup` or descends from it
pub fn is_subclass_of(sub: &ClassRef, sup: &ClassRef) -> bool {
    sub.is_subclass_of(sup)
}

/// Check if a value is an instance of a class or carries it as a mixin
///
/// Primitives, functions and classes are never instances. Records and lists
/// are instances of the root only. Fails when `class_or_mixin` is not a
/// class.
pub fn is_instance_of(value: &Value, class_or_mixin: &Value) -> ClassResult<bool> {
    let Value::Class(target) = class_or_mixin else {
        return Err(ClassError::InvalidArgument(format!(
            "expected a class, got {}",
            class_or_mixin.type_name()
        )));
    };

    match value {
        Value::Object(obj) => {
            let class = obj.class();
            Ok(class.is_subclass_of(target) || class.has_mixin(target))
        }
        Value::Record(_) | Value::List(_) => Ok(target.is_root()),
        _ => Ok(false),
    }
}

/// Get the inheritance chain of a class
///
/// The first element is the class itself, the last is the root.
pub fn class_hierarchy(class: &ClassRef) -> Vec<ClassRef> {
    class.ancestors()
}
