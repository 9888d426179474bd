//! # Resource Instances
//!
//! A [`Resource`] is one instance of a resource type: a shared
//! [`PropertyRegistry`], the instance's own [`ValueStore`], and the
//! configuration it was handed.
//!
//! ## Access Modes
//!
//! Every property is reached through one uniform accessor, with an explicit
//! "was an argument given" discriminator ([`Arg`]) instead of one generated
//! method per property:
//!
//! | Call | Effect |
//! |------|--------|
//! | `property(p, Arg::Absent)` / `get(p)` | read the effective value |
//! | `property(p, Arg::Value(v))` | validate, store, return the stored value |
//! | `property(p, Arg::Value(Nil))` | deprecated: warn (or fail) and read |
//! | `set(p, v)` | pure assignment, the only way to store nil |
//!
//! ## Effective Value
//!
//! 1. The stored value, if the property is set.
//! 2. The instance name, for `name_property` properties.
//! 3. The default, evaluated on every read (lazy defaults are not memoized).
//! 4. `Nil`.
//!
//! Reading never changes what [`is_set`](Resource::is_set) reports.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::PropConfig;
use crate::error::{PropError, Result};
use crate::identity::{self, Identity};
use crate::property::{
    validation, DefaultValue, PropertyDescriptor, PropertyRegistry, Storage, NAME_PROPERTY,
};
use crate::store::ValueStore;
use crate::value::{PropertyMap, Value};

/// Argument to the combined accessor.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Arg {
    /// No argument given: a read.
    #[default]
    Absent,
    Value(Value),
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Value(value)
    }
}

#[derive(Debug, Clone)]
pub struct Resource {
    registry: Arc<PropertyRegistry>,
    store: ValueStore,
    config: PropConfig,
}

impl Resource {
    /// Create an instance named `name`, with default configuration.
    ///
    /// The name is assigned to the `name` property like any explicit set, so
    /// it is coerced and validated.
    pub fn new(registry: Arc<PropertyRegistry>, name: impl Into<Value>) -> Result<Self> {
        Self::with_config(registry, name, PropConfig::default())
    }

    pub fn with_config(
        registry: Arc<PropertyRegistry>,
        name: impl Into<Value>,
        config: PropConfig,
    ) -> Result<Self> {
        let mut resource = Self {
            registry,
            store: ValueStore::new(),
            config,
        };
        resource.set(NAME_PROPERTY, name.into())?;
        Ok(resource)
    }

    pub fn registry(&self) -> &Arc<PropertyRegistry> {
        &self.registry
    }

    pub fn resource_name(&self) -> &str {
        self.registry.resource_name()
    }

    pub fn store(&self) -> &ValueStore {
        &self.store
    }

    pub fn config(&self) -> &PropConfig {
        &self.config
    }

    /// The configuration is consulted at call time, so changes here apply to
    /// the next accessor call.
    pub fn config_mut(&mut self) -> &mut PropConfig {
        &mut self.config
    }

    /// The instance name.
    pub fn name(&self) -> Result<Value> {
        self.get(NAME_PROPERTY)
    }

    /// The combined get/set accessor.
    pub fn property(&mut self, name: &str, arg: Arg) -> Result<Value> {
        let descriptor = Arc::clone(self.registry.property(name)?);
        match arg {
            Arg::Absent => self.read(&descriptor),
            Arg::Value(Value::Nil) => {
                self.deprecated_nil_set(&descriptor)?;
                self.read(&descriptor)
            }
            Arg::Value(value) => self.write(&descriptor, value),
        }
    }

    /// Read the effective value.
    pub fn get(&self, name: &str) -> Result<Value> {
        let descriptor = self.registry.property(name)?;
        self.read(descriptor)
    }

    /// Pure assignment.
    ///
    /// Always stores. Nil skips coercion and validation: it is how a property
    /// is deliberately reset to "no value", and it still counts as set.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<Value> {
        let descriptor = Arc::clone(self.registry.property(name)?);
        let value = value.into();
        if value.is_nil() {
            if let Storage::Methods(accessor) = descriptor.storage() {
                return Ok(accessor.set(&mut self.store, Value::Nil));
            }
            debug!(resource = self.resource_name(), property = name, "Set to nil");
            self.store.insert(name, Value::Nil);
            return Ok(Value::Nil);
        }
        self.write(&descriptor, value)
    }

    /// Whether the property received an explicit assignment.
    ///
    /// Method-backed properties always report true.
    pub fn is_set(&self, name: &str) -> Result<bool> {
        let descriptor = self.registry.property(name)?;
        Ok(match descriptor.storage() {
            Storage::Methods(_) => true,
            Storage::Store => self.store.contains(name),
        })
    }

    /// Forget an explicit assignment so the default applies again.
    ///
    /// Method-backed properties manage their own storage and are left alone.
    pub fn reset(&mut self, name: &str) -> Result<()> {
        let descriptor = self.registry.property(name)?;
        if descriptor.is_method_backed() {
            debug!(resource = self.resource_name(), property = name, "Reset skipped, method-backed");
            return Ok(());
        }
        if self.store.remove(name).is_some() {
            debug!(resource = self.resource_name(), property = name, "Reset");
        }
        Ok(())
    }

    pub fn identity(&self) -> Result<Identity> {
        identity::resolve_identity(self)
    }

    pub fn state(&self) -> Result<PropertyMap> {
        identity::resolve_state(self)
    }

    fn read(&self, descriptor: &PropertyDescriptor) -> Result<Value> {
        if let Storage::Methods(accessor) = descriptor.storage() {
            return Ok(accessor.get(&self.store));
        }
        if let Some(value) = self.store.get(descriptor.name()) {
            return Ok(value.clone());
        }
        if descriptor.is_name_property() && descriptor.name() != NAME_PROPERTY {
            return self.name();
        }
        Ok(match descriptor.default() {
            Some(DefaultValue::Value(value)) => value.clone(),
            Some(DefaultValue::Lazy(f)) => f(),
            Some(DefaultValue::FromResource(f)) => f(self),
            None => Value::Nil,
        })
    }

    fn write(&mut self, descriptor: &PropertyDescriptor, raw: Value) -> Result<Value> {
        if let Storage::Methods(accessor) = descriptor.storage() {
            return Ok(accessor.set(&mut self.store, raw));
        }
        let value = validation::coerce_and_validate(self.resource_name(), descriptor, raw)
            .inspect_err(|e| {
                debug!(resource = self.resource_name(), property = descriptor.name(), error = %e, "Set rejected");
            })?;
        debug!(resource = self.resource_name(), property = descriptor.name(), value = %value, "Set");
        self.store.insert(descriptor.name(), value.clone());
        Ok(value)
    }

    /// `property(p, Arg::Value(Nil))` can't tell "set to nothing" from "read".
    /// It reads, after a deprecation warning, or fails if warnings are errors.
    fn deprecated_nil_set(&self, descriptor: &PropertyDescriptor) -> Result<()> {
        let message = format!(
            "{}.{}: passing nil to the property accessor reads the value and will not reset it; \
             assign nil with `set` to clear it",
            self.resource_name(),
            descriptor.name()
        );
        if self.config.treat_deprecation_warnings_as_errors {
            return Err(PropError::DeprecatedFeature(message));
        }
        warn!(
            resource = self.resource_name(),
            property = descriptor.name(),
            "{}",
            message
        );
        Ok(())
    }
}
