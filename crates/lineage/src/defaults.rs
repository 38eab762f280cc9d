//! Named constants shared by the builder, definitions and logging.

/// Reserved definition key for the per-instance constructor.
pub const CONSTRUCTOR_KEY: &str = "constructor";

/// Reserved definition key for class-local statics.
pub const STATICS_KEY: &str = "statics";

/// Reserved definition key for statics propagated to every subclass.
pub const INHERITED_STATICS_KEY: &str = "inheritedStatics";

/// Reserved definition key for the ordered mixin list.
pub const MIXINS_KEY: &str = "mixins";

/// Static member invoked with each newly built class.
pub const CLASS_EXTENDED_HOOK: &str = "onClassExtended";

/// Debug name of the universal base class.
pub const ROOT_CLASS_NAME: &str = "Base";

/// Environment variable holding the tracing filter.
pub const LOG_ENV_VAR: &str = "LINEAGE_LOG";
