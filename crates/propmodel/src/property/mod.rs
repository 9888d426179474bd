//! # Property System
//!
//! Everything a resource type knows about its properties, independent of any
//! one instance:
//!
//! - **Descriptors**: immutable metadata for one property (type, default,
//!   coercion, `identity` / `desired_state` / `name_property` flags)
//! - **Constraints**: what values a property accepts
//! - **Validation**: coercion then constraint checking on explicit sets
//! - **Registry**: per-type declarations with inheritance, override and the
//!   identity attribute
//!
//! ## Usage
//!
//! ```
//! use propmodel::property::{PropertyDescriptor, PropertyRegistry, TypeConstraint};
//!
//! let mut registry = PropertyRegistry::new("file");
//! registry.declare(
//!     PropertyDescriptor::new("path")
//!         .of_type(TypeConstraint::string())
//!         .identity(true),
//! );
//! registry.declare(PropertyDescriptor::new("mode").default_value("0644"));
//!
//! assert_eq!(registry.identity_attr(), "path");
//! assert_eq!(registry.state_attrs(), vec!["path", "mode"]);
//! ```

mod constraint;
mod descriptor;
mod registry;
pub mod validation;

pub use constraint::{ConstraintViolation, PredicateFn, TypeConstraint, ValueKind};
pub use descriptor::{
    Coercion, DefaultValue, LazyFn, MethodAccessor, PropertyDescriptor, PropertyOptions,
    ResourceFn, Storage,
};
pub use registry::{PropertyRegistry, NAME_PROPERTY};
