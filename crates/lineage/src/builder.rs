//! Class builder
//!
//! Composes a new class from a superclass and a definition. The order in
//! which the pieces are laid down decides every precedence rule:
//!
//! | Step | Source                         | Rule                                   |
//! |------|--------------------------------|----------------------------------------|
//! | 1    | superclass member table        | copied, lowest precedence              |
//! | 2    | definition members             | overwrite inherited members            |
//! | 3    | inherited statics              | definition entries beat the chain's    |
//! | 4    | definition statics             | overwrite inherited statics, this class only |
//! | 5    | mixins, last listed first      | fill only names still absent           |
//! | 6    | `onClassExtended` static       | called once the class is complete      |
//!
//! A class escapes to the caller only after its hook returned successfully.

use tracing::{debug, trace};

use crate::class::{Class, ClassParts, ClassRef};
use crate::defaults::CLASS_EXTENDED_HOOK;
use crate::definition::ClassDefinition;
use crate::merge;
use crate::value::{Members, Value};
use crate::ClassResult;

/// Build a class from `definition`, deriving from `superclass`
///
/// Without a superclass the class derives from [`Class::root`]. Without a
/// constructor the class forwards construction to its superclass unchanged.
pub fn build(superclass: Option<&ClassRef>, definition: ClassDefinition) -> ClassResult<ClassRef> {
    let superclass = superclass.cloned().unwrap_or_else(Class::root);

    let ClassDefinition {
        name,
        constructor,
        members: own_members,
        statics,
        inherited_statics,
        mixins,
    } = definition;

    let mut members = superclass.members_snapshot();
    merge::apply(&mut members, &own_members);

    let inherited_statics =
        merge::merge_inherited(superclass.inherited_statics_arc(), inherited_statics);

    let mut class_statics = Members::default();
    if let Some(inherited) = &inherited_statics {
        merge::apply(&mut class_statics, inherited);
    }
    merge::apply(&mut class_statics, &statics);

    for mixin in mixins.iter().rev() {
        let copied = merge::apply_if_absent(&mut members, &mixin.members_snapshot());
        trace!(mixin = mixin.display_name(), copied, "mixin flattened");
    }

    let class = Class::assemble(ClassParts {
        name,
        superclass: Some(superclass),
        constructor,
        members,
        statics: class_statics,
        inherited_statics,
        mixins,
    });

    debug!(
        class = class.display_name(),
        id = class.id().as_u64(),
        superclass = class.superclass().map(|s| s.display_name()).unwrap_or_default(),
        mixins = class.mixins().len(),
        "class built"
    );

    if let Some(Value::Function(hook)) = class.get_static(CLASS_EXTENDED_HOOK) {
        debug!(class = class.display_name(), "invoking {}", CLASS_EXTENDED_HOOK);
        hook.call(&class.to_value(), &[class.to_value()])?;
    }

    Ok(class)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Construct;
    use crate::ClassError;

    #[test]
    fn test_build_defaults_to_root() {
        let class = build(None, ClassDefinition::new().named("Plain")).unwrap();
        assert!(class.superclass().unwrap().is_root());
        assert!(class.inherited_statics().is_none());
        assert!(class.mixins().is_empty());
    }

    #[test]
    fn test_members_inherited_by_copy() {
        let base = build(None, ClassDefinition::new().member("a", Value::from(1))).unwrap();
        let derived = build(Some(&base), ClassDefinition::new().member("b", Value::from(2))).unwrap();

        assert_eq!(derived.member("a"), Some(Value::from(1)));
        assert_eq!(derived.member("b"), Some(Value::from(2)));
        assert!(!base.has_member("b"));
    }

    #[test]
    fn test_own_member_overrides_inherited() {
        let base = build(None, ClassDefinition::new().member("a", Value::from(1))).unwrap();
        let derived = base
            .extend(ClassDefinition::new().member("a", Value::from(10)))
            .unwrap();

        assert_eq!(base.member("a"), Some(Value::from(1)));
        assert_eq!(derived.member("a"), Some(Value::from(10)));
    }

    #[test]
    fn test_mixin_does_not_replace_inherited_member() {
        let mixin = build(None, ClassDefinition::new().member("a", Value::from(99))).unwrap();
        let base = build(None, ClassDefinition::new().member("a", Value::from(1))).unwrap();
        let derived = base.extend(ClassDefinition::new().mixin(&mixin)).unwrap();

        assert_eq!(derived.member("a"), Some(Value::from(1)));
    }

    #[test]
    fn test_mixin_fills_undefined_placeholder() {
        let mixin = build(None, ClassDefinition::new().member("x", Value::from(1))).unwrap();
        let host = build(
            None,
            ClassDefinition::new().member("x", Value::Undefined).mixin(&mixin),
        )
        .unwrap();

        assert_eq!(host.member("x"), Some(Value::from(1)));
    }

    #[test]
    fn test_mixin_contributes_its_inherited_members() {
        let grand = build(None, ClassDefinition::new().member("deep", Value::from(7))).unwrap();
        let mixin = grand.extend(ClassDefinition::new()).unwrap();
        let host = build(None, ClassDefinition::new().mixin(&mixin)).unwrap();

        assert_eq!(host.member("deep"), Some(Value::from(7)));
    }

    #[test]
    fn test_statics_resolved() {
        let class = build(
            None,
            ClassDefinition::new()
                .inherited_static("shared", Value::from(1))
                .inherited_static("both", Value::from(2))
                .static_member("both", Value::from(3))
                .static_member("local", Value::from(4)),
        )
        .unwrap();

        assert_eq!(class.get_static("shared"), Some(Value::from(1)));
        assert_eq!(class.get_static("both"), Some(Value::from(3)));
        assert_eq!(class.get_static("local"), Some(Value::from(4)));
        assert_eq!(class.statics().len(), 3);

        let inherited = class.inherited_statics().unwrap();
        assert_eq!(inherited.get("both"), Some(&Value::from(2)));
        assert!(!inherited.contains_key("local"));
    }

    #[test]
    fn test_non_function_hook_is_ignored() {
        let class = build(
            None,
            ClassDefinition::new().static_member(CLASS_EXTENDED_HOOK, Value::from(1)),
        );
        assert!(class.is_ok());
    }

    #[test]
    fn test_hook_error_propagates() {
        let result = build(
            None,
            ClassDefinition::new().static_method(CLASS_EXTENDED_HOOK, |_, _| {
                Err(ClassError::Raised("rejected".to_string()))
            }),
        );
        assert_eq!(result.unwrap_err(), ClassError::Raised("rejected".to_string()));
    }

    #[test]
    fn test_forwarding_constructor_passes_arguments() {
        let base = build(
            None,
            ClassDefinition::new().constructor(|this, args| {
                this.set("count", Value::from(args.len() as i32));
                Ok(Construct::Fresh)
            }),
        )
        .unwrap();
        let derived = base.extend(ClassDefinition::new()).unwrap();

        let obj = derived
            .instantiate(&[Value::Null, Value::Null, Value::Null])
            .unwrap();
        let obj = obj.as_object().unwrap();
        assert_eq!(obj.get("count"), Some(Value::from(3)));
        assert!(obj.class().ptr_eq(&derived));
    }
}
