//! Per-resource-type property registry.
//!
//! A [`PropertyRegistry`] is one layer of declarations for one resource type,
//! plus a reference to its parent type's registry. Lookups walk the chain
//! from the local layer upward.
//!
//! ## Inheritance
//!
//! ```text
//! base (Arc, frozen)      x  y  name
//!   └── sub (local)          y' z          y' shadows base's y
//!
//! sub.all_names()  == [name, x, y, z]      y keeps base's position
//! sub.resolve("y") == y'
//! base.resolve("y") == y                   never affected by sub
//! ```
//!
//! Parents are shared through `Arc` and only ever read, so declaring in a
//! subtype can't reach an ancestor's entries. A type must be fully declared
//! before it is subclassed.
//!
//! ## Identity
//!
//! A layer may name its identity attribute explicitly
//! ([`set_identity_attr`](PropertyRegistry::set_identity_attr)). The override
//! is inherited by subtypes unless they set their own. See
//! [`identity_attrs`](PropertyRegistry::identity_attrs) for how it combines
//! with `identity: true` declarations.
//!
//! ## Desired State
//!
//! By default the state set is every `desired_state: true` property. A layer
//! may replace it with an explicit list
//! ([`set_state_attrs`](PropertyRegistry::set_state_attrs)). The list governs
//! properties declared at or above that layer; subtypes still add their own
//! `desired_state` properties on top.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::constraint::TypeConstraint;
use super::descriptor::{MethodAccessor, PropertyDescriptor, PropertyOptions};
use crate::error::{PropError, Result};
use crate::value::Value;

/// The property every resource type starts with.
pub const NAME_PROPERTY: &str = "name";

/// Declarations for one resource type, layered over its parent's.
pub struct PropertyRegistry {
    resource_name: String,
    parent: Option<Arc<PropertyRegistry>>,
    /// Local declarations, in declaration order, unique by name.
    local: Vec<Arc<PropertyDescriptor>>,
    /// Plain getter/setter pairs not declared as properties.
    methods: Vec<(String, Arc<dyn MethodAccessor>)>,
    identity_override: Option<String>,
    state_override: Option<Vec<String>>,
}

impl PropertyRegistry {
    /// A root registry. Declares the implicit `name` property.
    pub fn new(resource_name: impl Into<String>) -> Self {
        let mut registry = Self::empty(resource_name.into(), None);
        registry.declare(name_descriptor());
        registry
    }

    /// A registry for a subtype of `parent`.
    pub fn subclass(parent: &Arc<PropertyRegistry>, resource_name: impl Into<String>) -> Self {
        Self::empty(resource_name.into(), Some(Arc::clone(parent)))
    }

    fn empty(resource_name: String, parent: Option<Arc<PropertyRegistry>>) -> Self {
        Self {
            resource_name,
            parent,
            local: Vec::new(),
            methods: Vec::new(),
            identity_override: None,
            state_override: None,
        }
    }

    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    pub fn parent(&self) -> Option<&Arc<PropertyRegistry>> {
        self.parent.as_ref()
    }

    /// Declare (or re-declare) a property in this layer.
    ///
    /// Re-declaring a local name replaces it in place. Declaring a name that
    /// only exists in an ancestor shadows it here and in further subtypes.
    pub fn declare(&mut self, descriptor: PropertyDescriptor) -> Arc<PropertyDescriptor> {
        let descriptor = Arc::new(descriptor);
        let name = descriptor.name();
        match self.local.iter().position(|d| d.name() == name) {
            Some(idx) => {
                debug!(resource = %self.resource_name, property = name, "Redeclared");
                self.local[idx] = Arc::clone(&descriptor);
            }
            None => {
                if self.parent.as_ref().and_then(|p| p.resolve(name)).is_some() {
                    debug!(resource = %self.resource_name, property = name, "Overrode inherited");
                } else {
                    debug!(resource = %self.resource_name, property = name, "Declared");
                }
                self.local.push(Arc::clone(&descriptor));
            }
        }
        descriptor
    }

    /// Declare from an options record.
    pub fn declare_property(
        &mut self,
        name: impl Into<String>,
        options: PropertyOptions,
    ) -> Arc<PropertyDescriptor> {
        self.declare(PropertyDescriptor::with_options(name, options))
    }

    /// Local lookup first, then the ancestors.
    pub fn resolve(&self, name: &str) -> Option<&Arc<PropertyDescriptor>> {
        self.resolve_with_depth(name).map(|(_, d)| d)
    }

    /// Like [`resolve`](Self::resolve), but an undeclared name is an error.
    pub fn property(&self, name: &str) -> Result<&Arc<PropertyDescriptor>> {
        self.resolve(name)
            .ok_or_else(|| PropError::unknown(&self.resource_name, name))
    }

    /// Resolve along with how many layers up the declaration lives (0 = here).
    fn resolve_with_depth(&self, name: &str) -> Option<(usize, &Arc<PropertyDescriptor>)> {
        if let Some(d) = self.local.iter().find(|d| d.name() == name) {
            return Some((0, d));
        }
        self.parent
            .as_ref()
            .and_then(|p| p.resolve_with_depth(name))
            .map(|(depth, d)| (depth + 1, d))
    }

    /// Every property name, ancestors first.
    ///
    /// Overrides keep the position the ancestor gave them; names new to this
    /// layer follow in declaration order.
    pub fn all_names(&self) -> Vec<String> {
        let mut names = match &self.parent {
            Some(parent) => parent.all_names(),
            None => Vec::new(),
        };
        for d in &self.local {
            if !names.iter().any(|n| n == d.name()) {
                names.push(d.name().to_string());
            }
        }
        names
    }

    /// Resolved descriptors in [`all_names`](Self::all_names) order.
    pub fn properties(&self) -> Vec<Arc<PropertyDescriptor>> {
        self.all_names()
            .iter()
            .filter_map(|name| self.resolve(name).cloned())
            .collect()
    }

    /// Register a plain getter/setter pair that is not a declared property.
    ///
    /// It stays invisible to [`resolve`](Self::resolve) until something that
    /// affects identity or state refers to it.
    pub fn define_methods(&mut self, name: impl Into<String>, accessor: Arc<dyn MethodAccessor>) {
        let name = name.into();
        debug!(resource = %self.resource_name, property = %name, "Defined methods");
        self.methods.retain(|(n, _)| *n != name);
        self.methods.push((name, accessor));
    }

    fn resolve_methods(&self, name: &str) -> Option<Arc<dyn MethodAccessor>> {
        self.methods
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, accessor)| Arc::clone(accessor))
            .or_else(|| self.parent.as_ref().and_then(|p| p.resolve_methods(name)))
    }

    /// Make sure `name` has a descriptor, synthesizing one for plain methods.
    ///
    /// A declared property is returned as is. Plain methods get an adapter
    /// descriptor (no constraint, `desired_state = true`) declared in this
    /// layer. Anything else is an [`PropError::UnknownProperty`].
    pub fn implicitly_register(
        &mut self,
        name: &str,
        identity: bool,
    ) -> Result<Arc<PropertyDescriptor>> {
        if let Some(existing) = self.resolve(name) {
            return Ok(Arc::clone(existing));
        }
        let accessor = self
            .resolve_methods(name)
            .ok_or_else(|| PropError::unknown(&self.resource_name, name))?;
        debug!(resource = %self.resource_name, property = name, "Implicitly registered");
        Ok(self.declare(PropertyDescriptor::from_methods(name, accessor, identity)))
    }

    /// Name the identity attribute for this type and its subtypes.
    ///
    /// The ancestor's override, if any, is left alone.
    pub fn set_identity_attr(&mut self, name: &str) -> Result<()> {
        self.implicitly_register(name, true)?;
        debug!(resource = %self.resource_name, property = name, "Identity attribute set");
        self.identity_override = Some(name.to_string());
        Ok(())
    }

    /// The nearest identity override and the layer depth it was set at.
    fn identity_override_with_depth(&self) -> Option<(usize, &str)> {
        if let Some(name) = &self.identity_override {
            return Some((0, name));
        }
        self.parent
            .as_ref()
            .and_then(|p| p.identity_override_with_depth())
            .map(|(depth, name)| (depth + 1, name))
    }

    /// The identity override in effect for this type, if any.
    pub fn identity_override(&self) -> Option<&str> {
        self.identity_override_with_depth().map(|(_, name)| name)
    }

    /// The single attribute reported as this type's identity attribute.
    ///
    /// The override if one is in effect, else the first `identity: true`
    /// property, else `name`.
    pub fn identity_attr(&self) -> String {
        if let Some(name) = self.identity_override() {
            return name.to_string();
        }
        self.properties()
            .iter()
            .find(|d| d.is_identity())
            .map(|d| d.name().to_string())
            .unwrap_or_else(|| NAME_PROPERTY.to_string())
    }

    /// The effective identity set, in declaration order.
    ///
    /// - With an override set at some layer: the override, plus any
    ///   `identity: true` property declared in a subtype of that layer.
    ///   Identity flags at or above the overriding layer are ignored.
    /// - Without one: every `identity: true` property.
    /// - If that is empty: `[name]`.
    pub fn identity_attrs(&self) -> Vec<String> {
        if let Some((override_depth, override_name)) = self.identity_override_with_depth() {
            return self
                .all_names()
                .into_iter()
                .filter(|name| {
                    name == override_name
                        || self
                            .resolve_with_depth(name)
                            .is_some_and(|(depth, d)| d.is_identity() && depth < override_depth)
                })
                .collect();
        }

        let flagged: Vec<String> = self
            .properties()
            .iter()
            .filter(|d| d.is_identity())
            .map(|d| d.name().to_string())
            .collect();
        if flagged.is_empty() {
            vec![NAME_PROPERTY.to_string()]
        } else {
            flagged
        }
    }

    /// Whether `name` is part of the effective identity set.
    pub fn is_identity(&self, name: &str) -> Result<bool> {
        self.property(name)?;
        Ok(self.identity_attrs().iter().any(|n| n == name))
    }

    /// Replace this type's desired-state properties with `names`.
    ///
    /// Names with only plain methods are implicitly registered. Names with
    /// neither get a bare property in this layer. Descriptors, here and in
    /// ancestors, are left as they are.
    pub fn set_state_attrs(&mut self, names: &[&str]) -> Result<()> {
        for name in names {
            if self.resolve(name).is_none() && self.resolve_methods(name).is_none() {
                self.declare(PropertyDescriptor::new(*name));
            }
            self.implicitly_register(name, false)?;
        }
        debug!(resource = %self.resource_name, ?names, "State attributes set");
        self.state_override = Some(names.iter().map(|n| n.to_string()).collect());
        Ok(())
    }

    fn state_override_with_depth(&self) -> Option<(usize, &[String])> {
        if let Some(names) = &self.state_override {
            return Some((0, names.as_slice()));
        }
        self.parent
            .as_ref()
            .and_then(|p| p.state_override_with_depth())
            .map(|(depth, names)| (depth + 1, names))
    }

    /// The desired-state properties, in declaration order.
    ///
    /// Identity membership doesn't matter. Without a state override these
    /// are the `desired_state: true` properties, which leaves out the
    /// implicit `name`. With one, properties declared at or above the
    /// overriding layer count only if listed.
    pub fn state_attrs(&self) -> Vec<String> {
        let state_override = self.state_override_with_depth();
        self.all_names()
            .into_iter()
            .filter(|name| match self.resolve_with_depth(name) {
                Some((depth, _)) if state_override.is_some_and(|(at, _)| depth >= at) => {
                    state_override.is_some_and(|(_, listed)| listed.iter().any(|n| n == name))
                }
                Some((_, d)) => d.is_desired_state(),
                None => false,
            })
            .collect()
    }
}

impl fmt::Debug for PropertyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyRegistry")
            .field("resource_name", &self.resource_name)
            .field("parent", &self.parent.as_ref().map(|p| p.resource_name()))
            .field("local", &self.local.iter().map(|d| d.name()).collect::<Vec<_>>())
            .field("methods", &self.methods.iter().map(|(n, _)| n).collect::<Vec<_>>())
            .field("identity_override", &self.identity_override)
            .field("state_override", &self.state_override)
            .finish()
    }
}

/// The implicit `name`: text, not desired state, not identity.
///
/// Lists are joined with `", "`, other scalars stringified.
fn name_descriptor() -> PropertyDescriptor {
    PropertyDescriptor::new(NAME_PROPERTY)
        .of_type(TypeConstraint::string())
        .desired_state(false)
        .coerce(|value| match value {
            Value::String(_) | Value::Nil => value,
            Value::List(items) => Value::String(
                items
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            other => Value::String(other.to_string()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ValueStore;

    struct Passthrough;

    impl MethodAccessor for Passthrough {
        fn get(&self, store: &ValueStore) -> Value {
            store.get("@slot").cloned().unwrap_or_default()
        }

        fn set(&self, store: &mut ValueStore, value: Value) -> Value {
            store.insert("@slot", value.clone());
            value
        }
    }

    fn base_with(props: &[&str]) -> PropertyRegistry {
        let mut registry = PropertyRegistry::new("base");
        for p in props {
            registry.declare(PropertyDescriptor::new(*p));
        }
        registry
    }

    #[test]
    fn root_registry_declares_name() {
        let registry = PropertyRegistry::new("thing");
        let name = registry.resolve("name").unwrap();
        assert!(!name.is_desired_state());
        assert!(!name.is_identity());
        assert_eq!(registry.all_names(), vec!["name"]);
    }

    #[test]
    fn redeclare_replaces_in_place() {
        let mut registry = base_with(&["x", "y"]);
        registry.declare(PropertyDescriptor::new("x").identity(true));
        assert_eq!(registry.all_names(), vec!["name", "x", "y"]);
        assert!(registry.resolve("x").unwrap().is_identity());
    }

    #[test]
    fn override_keeps_ancestor_position() {
        let base = Arc::new(base_with(&["x", "y"]));
        let mut sub = PropertyRegistry::subclass(&base, "sub");
        sub.declare(PropertyDescriptor::new("z"));
        sub.declare(PropertyDescriptor::new("y").desired_state(false));

        assert_eq!(sub.all_names(), vec!["name", "x", "y", "z"]);
        assert!(!sub.resolve("y").unwrap().is_desired_state());
        assert!(base.resolve("y").unwrap().is_desired_state());
        assert!(base.resolve("z").is_none());
    }

    #[test]
    fn property_errors_on_undeclared_name() {
        let registry = base_with(&["x"]);
        assert_eq!(
            registry.property("nope").unwrap_err(),
            PropError::UnknownProperty {
                resource: "base".into(),
                property: "nope".into()
            }
        );
    }

    #[test]
    fn name_is_default_identity() {
        let registry = base_with(&["x"]);
        assert_eq!(registry.identity_attr(), "name");
        assert_eq!(registry.identity_attrs(), vec!["name"]);
        assert!(registry.is_identity("name").unwrap());
        assert!(!registry.resolve("name").unwrap().is_identity());
    }

    #[test]
    fn identity_attr_is_first_flagged_property() {
        let mut registry = base_with(&[]);
        for p in ["x", "y", "z"] {
            registry.declare(PropertyDescriptor::new(p).identity(true));
        }
        assert_eq!(registry.identity_attr(), "x");
        assert_eq!(registry.identity_attrs(), vec!["x", "y", "z"]);
    }

    #[test]
    fn override_wins_over_flags_in_same_layer() {
        let mut registry = base_with(&[]);
        for p in ["x", "y", "z"] {
            registry.declare(PropertyDescriptor::new(p).identity(true));
        }
        registry.set_identity_attr("y").unwrap();
        assert_eq!(registry.identity_attr(), "y");
        assert_eq!(registry.identity_attrs(), vec!["y"]);
        assert!(!registry.is_identity("x").unwrap());
    }

    #[test]
    fn override_marks_property_as_identity_without_touching_descriptor() {
        let mut registry = base_with(&["x"]);
        registry.set_identity_attr("x").unwrap();
        assert!(registry.is_identity("x").unwrap());
        assert!(!registry.is_identity("name").unwrap());
        assert!(!registry.resolve("x").unwrap().is_identity());
    }

    #[test]
    fn override_is_inherited_but_not_pushed_up() {
        let mut base = base_with(&["x", "y"]);
        base.set_identity_attr("x").unwrap();
        let base = Arc::new(base);

        let inherit = PropertyRegistry::subclass(&base, "inherit");
        assert_eq!(inherit.identity_attr(), "x");

        let mut own = PropertyRegistry::subclass(&base, "own");
        own.set_identity_attr("y").unwrap();
        assert_eq!(own.identity_attr(), "y");
        assert_eq!(base.identity_attr(), "x");
    }

    #[test]
    fn subtype_identity_flags_extend_inherited_override() {
        let mut base = base_with(&["x"]);
        base.set_identity_attr("x").unwrap();
        let base = Arc::new(base);

        let mut sub = PropertyRegistry::subclass(&base, "sub");
        sub.declare(PropertyDescriptor::new("y").identity(true));
        assert_eq!(sub.identity_attr(), "x");
        assert_eq!(sub.identity_attrs(), vec!["x", "y"]);
        assert_eq!(base.identity_attrs(), vec!["x"]);
    }

    #[test]
    fn set_identity_attr_on_unknown_name_fails() {
        let mut registry = base_with(&["x"]);
        assert!(matches!(
            registry.set_identity_attr("ghost"),
            Err(PropError::UnknownProperty { .. })
        ));
        assert_eq!(registry.identity_override(), None);
    }

    #[test]
    fn methods_are_registered_on_identity_reference() {
        let mut registry = base_with(&[]);
        registry.define_methods("custom", Arc::new(Passthrough));
        assert!(registry.resolve("custom").is_none());

        registry.set_identity_attr("custom").unwrap();
        let d = registry.resolve("custom").unwrap();
        assert!(d.is_method_backed());
        assert!(d.is_desired_state());
        assert!(d.constraint().is_none());
        assert_eq!(registry.identity_attr(), "custom");
        assert_eq!(registry.state_attrs(), vec!["custom"]);
    }

    #[test]
    fn implicitly_register_returns_existing_descriptor() {
        let mut registry = base_with(&["x"]);
        let d = registry.implicitly_register("x", true).unwrap();
        assert!(!d.is_identity());
        assert!(!d.is_method_backed());
    }

    #[test]
    fn state_attrs_follow_desired_state_only() {
        let mut registry = base_with(&[]);
        registry.declare(PropertyDescriptor::new("x").identity(true));
        registry.declare(PropertyDescriptor::new("y").desired_state(false));
        registry.declare(PropertyDescriptor::new("z"));
        assert_eq!(registry.state_attrs(), vec!["x", "z"]);

        registry.set_identity_attr("y").unwrap();
        assert_eq!(registry.state_attrs(), vec!["x", "z"]);
    }

    #[test]
    fn state_attrs_override_adds_and_removes() {
        let mut registry = base_with(&["x", "z"]);
        registry.declare(PropertyDescriptor::new("y").desired_state(false));
        registry.set_state_attrs(&["y", "z"]).unwrap();

        assert_eq!(registry.state_attrs(), vec!["z", "y"]);
        assert!(!registry.resolve("y").unwrap().is_desired_state());
        assert!(registry.resolve("x").unwrap().is_desired_state());
    }

    #[test]
    fn state_attrs_override_does_not_affect_parent() {
        let base = Arc::new(base_with(&["x", "y"]));
        let mut sub = PropertyRegistry::subclass(&base, "sub");
        sub.set_state_attrs(&["x"]).unwrap();

        assert_eq!(sub.state_attrs(), vec!["x"]);
        assert_eq!(base.state_attrs(), vec!["x", "y"]);
    }

    #[test]
    fn state_attrs_override_is_inherited() {
        let mut base = base_with(&["x", "y"]);
        base.set_state_attrs(&["y"]).unwrap();
        let base = Arc::new(base);

        let mut sub = PropertyRegistry::subclass(&base, "sub");
        sub.declare(PropertyDescriptor::new("z"));
        sub.declare(PropertyDescriptor::new("w").desired_state(false));
        assert_eq!(sub.state_attrs(), vec!["y", "z"]);

        let mut own = PropertyRegistry::subclass(&base, "own");
        own.set_state_attrs(&["x"]).unwrap();
        assert_eq!(own.state_attrs(), vec!["x"]);
    }

    #[test]
    fn state_attrs_registers_methods_and_bare_names() {
        let mut registry = base_with(&["x"]);
        registry.define_methods("custom", Arc::new(Passthrough));
        registry.set_state_attrs(&["custom", "ghost"]).unwrap();

        let custom = registry.resolve("custom").unwrap();
        assert!(custom.is_method_backed());
        assert!(!custom.is_identity());
        let ghost = registry.resolve("ghost").unwrap();
        assert!(!ghost.is_method_backed());
        assert!(ghost.constraint().is_none());

        assert_eq!(registry.state_attrs(), vec!["custom", "ghost"]);
        assert_eq!(registry.identity_attrs(), vec!["name"]);
    }

    #[test]
    fn state_attrs_keeps_existing_descriptor() {
        let mut registry = base_with(&[]);
        registry.declare(PropertyDescriptor::new("x").of_type(TypeConstraint::integer()));
        registry.set_state_attrs(&["x"]).unwrap();
        assert!(registry.resolve("x").unwrap().constraint().is_some());
        assert_eq!(registry.all_names(), vec!["name", "x"]);
    }

    #[test]
    fn name_coercion_joins_lists() {
        let registry = PropertyRegistry::new("thing");
        let name = registry.resolve("name").unwrap();
        let joined = name
            .coercion()
            .unwrap()
            .apply(Value::from(vec!["a", "b"]));
        assert_eq!(joined, Value::from("a, b"));
    }
}
