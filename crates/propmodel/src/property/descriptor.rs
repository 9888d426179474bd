//! Property descriptors.
//!
//! A [`PropertyDescriptor`] is the immutable metadata for one declared
//! property: its name, what it accepts, how incoming values are coerced,
//! its default, and three independent flags.
//!
//! | Flag | Default | Meaning |
//! |------|---------|---------|
//! | `identity` | `false` | part of what uniquely names an instance |
//! | `desired_state` | `true` | compared against reality during convergence |
//! | `name_property` | `false` | unset value falls back to the instance name |
//!
//! Descriptors are shared as `Arc<PropertyDescriptor>` and never mutated.
//! A subtype that wants a different flag declares a modified copy in its own
//! registry layer; the ancestor's descriptor is untouched.

use std::fmt;
use std::sync::Arc;

use super::constraint::TypeConstraint;
use crate::resource::Resource;
use crate::store::ValueStore;
use crate::value::Value;

pub type LazyFn = Arc<dyn Fn() -> Value + Send + Sync>;
pub type ResourceFn = Arc<dyn Fn(&Resource) -> Value + Send + Sync>;

/// What an unset property reads as.
///
/// Lazy forms are evaluated on every read; nothing is memoized.
#[derive(Clone)]
pub enum DefaultValue {
    Value(Value),
    Lazy(LazyFn),
    /// Computed from the instance being read.
    FromResource(ResourceFn),
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Value(v) => f.debug_tuple("Value").field(v).finish(),
            DefaultValue::Lazy(_) => write!(f, "Lazy(..)"),
            DefaultValue::FromResource(_) => write!(f, "FromResource(..)"),
        }
    }
}

/// Transform applied to an incoming value before validation.
#[derive(Clone)]
pub struct Coercion(Arc<dyn Fn(Value) -> Value + Send + Sync>);

impl Coercion {
    pub fn new(f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn apply(&self, value: Value) -> Value {
        (self.0)(value)
    }
}

impl fmt::Debug for Coercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coercion(..)")
    }
}

/// A plain getter/setter pair for an attribute that was never declared as a
/// property.
///
/// Accessors keep whatever slots they like in the instance's
/// [`ValueStore`]; the slot names are theirs to choose.
pub trait MethodAccessor: Send + Sync {
    fn get(&self, store: &ValueStore) -> Value;

    /// Store `value` and return what the setter reports back.
    fn set(&self, store: &mut ValueStore, value: Value) -> Value;
}

/// Where a property's value lives.
#[derive(Clone)]
pub enum Storage {
    /// In the instance's [`ValueStore`], under the property name.
    Store,
    /// Behind pre-existing methods; the store is only reached through them.
    Methods(Arc<dyn MethodAccessor>),
}

impl fmt::Debug for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Storage::Store => write!(f, "Store"),
            Storage::Methods(_) => write!(f, "Methods(..)"),
        }
    }
}

/// The options record accepted by
/// [`PropertyRegistry::declare_property`](super::PropertyRegistry::declare_property).
#[derive(Debug, Clone)]
pub struct PropertyOptions {
    pub kind: Option<TypeConstraint>,
    pub default: Option<DefaultValue>,
    pub coerce: Option<Coercion>,
    pub identity: bool,
    pub desired_state: bool,
    pub name_property: bool,
}

impl Default for PropertyOptions {
    fn default() -> Self {
        Self {
            kind: None,
            default: None,
            coerce: None,
            identity: false,
            desired_state: true,
            name_property: false,
        }
    }
}

/// Immutable metadata for one declared property.
#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    name: String,
    kind: Option<TypeConstraint>,
    default: Option<DefaultValue>,
    coerce: Option<Coercion>,
    identity: bool,
    desired_state: bool,
    name_property: bool,
    storage: Storage,
}

impl PropertyDescriptor {
    /// A property with no constraint, no default and default flags.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_options(name, PropertyOptions::default())
    }

    pub fn with_options(name: impl Into<String>, options: PropertyOptions) -> Self {
        Self {
            name: name.into(),
            kind: options.kind,
            default: options.default,
            coerce: options.coerce,
            identity: options.identity,
            desired_state: options.desired_state,
            name_property: options.name_property,
            storage: Storage::Store,
        }
    }

    /// Adapter descriptor for an attribute defined only as plain methods.
    ///
    /// No constraint, `desired_state = true`, get/set delegated to `accessor`.
    pub fn from_methods(
        name: impl Into<String>,
        accessor: Arc<dyn MethodAccessor>,
        identity: bool,
    ) -> Self {
        Self {
            identity,
            storage: Storage::Methods(accessor),
            ..Self::new(name)
        }
    }

    pub fn of_type(mut self, kind: impl Into<TypeConstraint>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::Value(value.into()));
        self
    }

    pub fn lazy_default(mut self, f: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        self.default = Some(DefaultValue::Lazy(Arc::new(f)));
        self
    }

    pub fn default_from_resource(
        mut self,
        f: impl Fn(&Resource) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.default = Some(DefaultValue::FromResource(Arc::new(f)));
        self
    }

    pub fn coerce(mut self, f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        self.coerce = Some(Coercion::new(f));
        self
    }

    pub fn identity(mut self, identity: bool) -> Self {
        self.identity = identity;
        self
    }

    pub fn desired_state(mut self, desired_state: bool) -> Self {
        self.desired_state = desired_state;
        self
    }

    pub fn name_property(mut self, name_property: bool) -> Self {
        self.name_property = name_property;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn constraint(&self) -> Option<&TypeConstraint> {
        self.kind.as_ref()
    }

    pub fn default(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }

    pub fn coercion(&self) -> Option<&Coercion> {
        self.coerce.as_ref()
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn is_identity(&self) -> bool {
        self.identity
    }

    pub fn is_desired_state(&self) -> bool {
        self.desired_state
    }

    pub fn is_name_property(&self) -> bool {
        self.name_property
    }

    /// True when get/set go through a [`MethodAccessor`] rather than the store.
    pub fn is_method_backed(&self) -> bool {
        matches!(self.storage, Storage::Methods(_))
    }
}
