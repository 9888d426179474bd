//! # Propmodel Architecture
//!
//! Propmodel is the **property model** behind a declarative infrastructure
//! resource. A resource type declares typed, validated, inheritable
//! properties; from them every instance derives two views:
//!
//! - **Identity**: what uniquely names the instance.
//! - **Desired state**: the properties a convergence engine compares against
//!   reality.
//!
//! Parsing recipes, resolving providers, probing actual state and persisting
//! anything are the consuming system's job. This crate is the in-memory model
//! they all call into.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Views (identity.rs)                                        │
//! │  - identity(): scalar or map, depending on cardinality      │
//! │  - state(): every desired-state property                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Instances (resource.rs)                                    │
//! │  - combined get/set accessor + pure assignment              │
//! │  - defaults, name_property fallback, deprecation shim       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Types (property/)                                          │
//! │  - descriptors, constraints, validation                     │
//! │  - registry: inheritance, override, identity attribute      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each instance owns a [`ValueStore`]; the registry is shared, read-only
//! once built, and safe to read from any number of threads.
//!
//! ## Quick Example
//!
//! ```
//! use std::sync::Arc;
//! use propmodel::{PropertyDescriptor, PropertyRegistry, Resource, TypeConstraint, Value};
//!
//! let mut registry = PropertyRegistry::new("user");
//! registry.declare(
//!     PropertyDescriptor::new("username")
//!         .of_type(TypeConstraint::string())
//!         .identity(true)
//!         .name_property(true),
//! );
//! registry.declare(PropertyDescriptor::new("shell").default_value("/bin/sh"));
//! let registry = Arc::new(registry);
//!
//! let mut alice = Resource::new(Arc::clone(&registry), "alice")?;
//! alice.set("shell", "/bin/zsh")?;
//!
//! assert_eq!(alice.identity()?, Value::from("alice"));
//! assert_eq!(alice.state()?.get("shell"), Some(&Value::from("/bin/zsh")));
//! assert!(alice.set("username", 42).is_err());
//! # Ok::<(), propmodel::PropError>(())
//! ```
//!
//! ## Module Overview
//!
//! - [`property`]: descriptors, constraints, validation and the registry
//! - [`resource`]: instances and the accessor layer
//! - [`identity`]: identity and state resolution
//! - [`value`]: runtime values and ordered property maps
//! - [`store`]: per-instance storage
//! - [`config`]: configuration loading
//! - [`logging`]: tracing subscriber setup

pub mod config;
pub mod error;
pub mod identity;
pub mod logging;
pub mod property;
pub mod resource;
pub mod store;
pub mod value;

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures;

pub use config::PropConfig;
pub use error::{PropError, Result};
pub use identity::Identity;
pub use property::{
    MethodAccessor, PropertyDescriptor, PropertyOptions, PropertyRegistry, TypeConstraint,
    ValueKind,
};
pub use resource::{Arg, Resource};
pub use store::ValueStore;
pub use value::{PropertyMap, Value};
