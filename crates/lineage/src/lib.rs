//! Lineage: class hierarchies over a dynamic object model
//!
//! This crate provides:
//! - A class builder with single inheritance and constructor delegation
//! - Statics and inherited statics with per-generation precedence
//! - Mixin flattening onto a resolved member table
//! - A cached, transitive "does this class carry mixin M" query
//! - `is_instance_of` across ancestry and mixins
//!
//! Classes are built once and shared behind `Arc` handles. The only state
//! that grows after construction is the per-class mixin cache.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod builder;
pub mod class;
pub mod defaults;
pub mod definition;
pub mod introspection;
pub mod logging;
pub mod merge;
pub mod mixin;
pub mod object;
pub mod value;

pub use builder::build;
pub use class::{Class, ClassId, ClassRef};
pub use definition::ClassDefinition;
pub use introspection::{class_hierarchy, is_instance_of, is_subclass_of};
pub use mixin::{has_mixin, MixinId, MixinRegistry, Resolution};
pub use object::{Construct, Constructor, Object, ObjectRef};
pub use value::{Function, Members, Value};

/// Errors raised while building classes or invoking their members
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassError {
    /// An argument was not of the expected kind
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A dynamic definition record was malformed
    #[error("Invalid definition: {0}")]
    InvalidDefinition(String),

    /// A member was invoked that is missing or not a function
    #[error("'{name}' is not a function")]
    NotCallable {
        /// Member name
        name: String,
    },

    /// Error raised by user code (constructors, methods, hooks)
    #[error("{0}")]
    Raised(String),
}

impl From<String> for ClassError {
    fn from(s: String) -> Self {
        ClassError::Raised(s)
    }
}

impl From<&str> for ClassError {
    fn from(s: &str) -> Self {
        ClassError::Raised(s.to_string())
    }
}

/// Class operation result
pub type ClassResult<T> = Result<T, ClassError>;
