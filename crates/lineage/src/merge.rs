//! Member table composition helpers

use std::sync::Arc;

use crate::value::{Members, Value};

/// Copy every entry of `source` onto `target`, overwriting collisions
pub fn apply(target: &mut Members, source: &Members) {
    for (name, value) in source {
        target.insert(name.clone(), value.clone());
    }
}

/// Copy entries of `source` whose names `target` lacks
///
/// A name bound to `Undefined` counts as absent. Returns the number of
/// entries copied.
pub fn apply_if_absent(target: &mut Members, source: &Members) -> usize {
    let mut copied = 0;
    for (name, value) in source {
        if target.get(name).map_or(true, Value::is_undefined) {
            target.insert(name.clone(), value.clone());
            copied += 1;
        }
    }
    copied
}

/// Resolve the inherited statics of a new class
///
/// Entries declared by the class win over those handed down by its
/// superclass. Yields `None` when neither side declares any, and shares the
/// superclass table when the class adds nothing.
pub fn merge_inherited(
    parent: Option<&Arc<Members>>,
    own: Option<Members>,
) -> Option<Arc<Members>> {
    match (parent, own) {
        (None, None) => None,
        (Some(parent), None) => Some(Arc::clone(parent)),
        (None, Some(own)) => Some(Arc::new(own)),
        (Some(parent), Some(own)) => {
            let mut merged = (**parent).clone();
            apply(&mut merged, &own);
            Some(Arc::new(merged))
        }
    }
}
