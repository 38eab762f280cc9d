//! Mixin identities and the transitive mixin query
//!
//! Every class that becomes the target of a mixin query is given a stable
//! [`MixinId`] the first time it is asked about. Each class memoizes, per
//! mixin identity, whether it or any ancestor lists that mixin. Classes are
//! never restructured after they are built, so cached answers stay valid.
//!
//! Identities come from one process-wide [`MixinRegistry`], reachable only
//! through [`MixinRegistry::global`]. The counter is atomic and the per-class
//! cache is a `DashMap`, so queries may run from any thread.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::trace;

use crate::class::{Class, ClassRef};

/// The process-wide registry
static GLOBAL: MixinRegistry = MixinRegistry::new();

/// Identity of a class used as a mixin query target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MixinId(u64);

impl MixinId {
    /// Raw numeric value
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Outcome of a mixin query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Whether the class or an ancestor carries the mixin
    pub found: bool,
    /// Number of class levels consulted, cache hits included
    pub levels_visited: usize,
}

/// Source of mixin identities
#[derive(Debug)]
pub struct MixinRegistry {
    next_id: AtomicU64,
}

impl MixinRegistry {
    const fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
        }
    }

    /// The registry shared by every class in the process
    pub fn global() -> &'static MixinRegistry {
        &GLOBAL
    }

    /// Get the identity of `class`, assigning one on first use
    pub fn identify(&self, class: &Class) -> MixinId {
        *class
            .mixin_id
            .get_or_init(|| MixinId(self.next_id.fetch_add(1, Ordering::Relaxed)))
    }

    /// Number of identities handed out so far
    pub fn assigned(&self) -> u64 {
        self.next_id.load(Ordering::Relaxed) - 1
    }

    /// Check whether `class` or any ancestor lists `mixin`
    ///
    /// The answer is cached on every level consulted, each under its own
    /// cache.
    pub fn resolve(&self, class: &ClassRef, mixin: &ClassRef) -> Resolution {
        let id = self.identify(mixin);
        let mut levels_visited = 0;
        let found = lookup(class, mixin, id, &mut levels_visited);
        Resolution {
            found,
            levels_visited,
        }
    }
}

/// Walk up from `class` until a cache hit, a class listing `mixin`, or the
/// end of the chain, then record the answer on every level that missed.
fn lookup(class: &Class, mixin: &ClassRef, id: MixinId, visited: &mut usize) -> bool {
    let mut missed: Vec<&Class> = Vec::new();
    let mut current = class;

    let found = loop {
        *visited += 1;

        let cached = current.mixin_cache.get(&id).map(|entry| *entry);
        if let Some(found) = cached {
            trace!(class = current.display_name(), mixin = id.0, found, "mixin cache hit");
            break found;
        }

        missed.push(current);
        if current.mixins().iter().any(|m| m.ptr_eq(mixin)) {
            break true;
        }

        match current.superclass() {
            Some(superclass) if !superclass.is_root() => current = &**superclass,
            _ => break false,
        }
    };

    for level in missed {
        trace!(class = level.display_name(), mixin = id.0, found, "mixin resolved");
        level.mixin_cache.insert(id, found);
    }
    found
}

/// Check whether `class` or any ancestor carries `mixin`
pub fn has_mixin(class: &ClassRef, mixin: &ClassRef) -> bool {
    MixinRegistry::global().resolve(class, mixin).found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::ClassDefinition;
    use crate::value::Value;

    fn class() -> ClassRef {
        Class::root().extend(ClassDefinition::new()).unwrap()
    }

    #[test]
    fn test_identity_is_stable() {
        let registry = MixinRegistry::global();
        let mixin = class();

        let first = registry.identify(&mixin);
        let second = registry.identify(&mixin);
        assert_eq!(first, second);
    }

    #[test]
    fn test_identity_is_per_class() {
        let registry = MixinRegistry::global();
        let a = Class::root()
            .extend(ClassDefinition::new().member("x", Value::from(1)))
            .unwrap();
        let b = Class::root()
            .extend(ClassDefinition::new().member("x", Value::from(1)))
            .unwrap();

        assert_ne!(registry.identify(&a), registry.identify(&b));
    }

    #[test]
    fn test_identity_assigned_lazily() {
        let mixin = class();
        assert!(mixin.mixin_id.get().is_none());

        let host = class();
        host.has_mixin(&mixin);
        assert!(mixin.mixin_id.get().is_some());
        assert!(MixinRegistry::global().assigned() >= 1);
    }

    #[test]
    fn test_direct_mixin() {
        let mixin = class();
        let host = Class::root()
            .extend(ClassDefinition::new().mixin(&mixin))
            .unwrap();

        assert!(has_mixin(&host, &mixin));
        assert!(!has_mixin(&mixin, &host));
    }

    #[test]
    fn test_structurally_equal_mixins_are_distinct() {
        let m1 = Class::root()
            .extend(ClassDefinition::new().member("x", Value::from(1)))
            .unwrap();
        let m2 = Class::root()
            .extend(ClassDefinition::new().member("x", Value::from(1)))
            .unwrap();
        let host = Class::root().extend(ClassDefinition::new().mixin(&m1)).unwrap();

        assert!(host.has_mixin(&m1));
        assert!(!host.has_mixin(&m2));
    }

    #[test]
    fn test_cache_populated_on_each_level() {
        let mixin = class();
        let top = Class::root().extend(ClassDefinition::new().mixin(&mixin)).unwrap();
        let middle = top.extend(ClassDefinition::new()).unwrap();
        let bottom = middle.extend(ClassDefinition::new()).unwrap();

        let first = MixinRegistry::global().resolve(&bottom, &mixin);
        assert!(first.found);
        assert_eq!(first.levels_visited, 3);

        let id = MixinRegistry::global().identify(&mixin);
        assert_eq!(bottom.mixin_cache.get(&id).map(|e| *e), Some(true));
        assert_eq!(middle.mixin_cache.get(&id).map(|e| *e), Some(true));
        assert_eq!(top.mixin_cache.get(&id).map(|e| *e), Some(true));

        let second = MixinRegistry::global().resolve(&bottom, &mixin);
        assert!(second.found);
        assert_eq!(second.levels_visited, 1);
    }

    #[test]
    fn test_negative_answers_are_cached() {
        let mixin = class();
        let a = class();
        let b = a.extend(ClassDefinition::new()).unwrap();

        let first = MixinRegistry::global().resolve(&b, &mixin);
        assert!(!first.found);
        assert_eq!(first.levels_visited, 2);

        let second = MixinRegistry::global().resolve(&b, &mixin);
        assert!(!second.found);
        assert_eq!(second.levels_visited, 1);
    }

    #[test]
    fn test_root_has_no_mixins() {
        let mixin = class();
        assert!(!Class::root().has_mixin(&mixin));
    }
}
