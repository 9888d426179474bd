//! Test fixtures: registry builders and a sample method-backed accessor.

use std::sync::Arc;

use crate::property::{MethodAccessor, PropertyDescriptor, PropertyRegistry};
use crate::resource::Resource;
use crate::store::ValueStore;
use crate::value::Value;

/// Builds a registry declaration by declaration.
pub struct RegistryFixture {
    pub registry: PropertyRegistry,
}

impl RegistryFixture {
    pub fn new(resource_name: &str) -> Self {
        Self {
            registry: PropertyRegistry::new(resource_name),
        }
    }

    pub fn subclass_of(parent: &Arc<PropertyRegistry>, resource_name: &str) -> Self {
        Self {
            registry: PropertyRegistry::subclass(parent, resource_name),
        }
    }

    pub fn with(mut self, descriptor: PropertyDescriptor) -> Self {
        self.registry.declare(descriptor);
        self
    }

    /// A bare property with default flags.
    pub fn with_bare(self, name: &str) -> Self {
        self.with(PropertyDescriptor::new(name))
    }

    pub fn with_identity_attr(mut self, name: &str) -> Self {
        self.registry
            .set_identity_attr(name)
            .expect("identity attr must name a declared property or methods");
        self
    }

    pub fn with_state_attrs(mut self, names: &[&str]) -> Self {
        self.registry
            .set_state_attrs(names)
            .expect("state attrs must name properties or methods");
        self
    }

    pub fn with_methods(mut self, name: &str, accessor: Arc<dyn MethodAccessor>) -> Self {
        self.registry.define_methods(name, accessor);
        self
    }

    pub fn build(self) -> Arc<PropertyRegistry> {
        Arc::new(self.registry)
    }

    /// Build and instantiate in one go.
    pub fn instance(self, name: &str) -> Resource {
        Resource::new(self.build(), name).expect("instance name must be valid")
    }
}

/// Getter returns the slot times three, setter stores its argument times two,
/// both through a slot that is not named after the property.
pub struct ScaledMethods {
    pub slot: &'static str,
}

impl MethodAccessor for ScaledMethods {
    fn get(&self, store: &ValueStore) -> Value {
        match store.get(self.slot).and_then(Value::as_i64) {
            Some(n) => Value::Integer(n * 3),
            None => Value::Nil,
        }
    }

    fn set(&self, store: &mut ValueStore, value: Value) -> Value {
        let stored = match value.as_i64() {
            Some(n) => Value::Integer(n * 2),
            None => value,
        };
        store.insert(self.slot, stored.clone());
        stored
    }
}
