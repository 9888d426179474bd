//! # Identity and Desired State
//!
//! Two views computed on demand from a resource's registry and store. Nothing
//! here is cached.
//!
//! ## Identity
//!
//! The effective identity set comes from
//! [`PropertyRegistry::identity_attrs`](crate::property::PropertyRegistry::identity_attrs).
//! Its size decides the shape:
//!
//! - **One member**: the member's effective value, defaults and
//!   `name_property` fallback included ([`Identity::Scalar`]).
//! - **Several members**: a map of only the members that are explicitly set
//!   ([`Identity::Composite`]). Defaults are left out so they can't leak into
//!   equality checks used for change detection. Nothing set gives an empty
//!   map.
//!
//! ## State
//!
//! Every property in
//! [`PropertyRegistry::state_attrs`](crate::property::PropertyRegistry::state_attrs)
//! mapped to its effective value, set or not. Unset properties without a
//! default appear as `Nil`.

use serde::Serialize;
use tracing::trace;

use crate::error::Result;
use crate::resource::Resource;
use crate::value::{PropertyMap, Value};

/// What uniquely names a resource instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Identity {
    Scalar(Value),
    Composite(PropertyMap),
}

impl Identity {
    pub fn is_composite(&self) -> bool {
        matches!(self, Identity::Composite(_))
    }

    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Identity::Scalar(value) => Some(value),
            Identity::Composite(_) => None,
        }
    }

    pub fn as_map(&self) -> Option<&PropertyMap> {
        match self {
            Identity::Scalar(_) => None,
            Identity::Composite(map) => Some(map),
        }
    }
}

impl PartialEq<Value> for Identity {
    fn eq(&self, other: &Value) -> bool {
        self.as_scalar() == Some(other)
    }
}

impl PartialEq<PropertyMap> for Identity {
    fn eq(&self, other: &PropertyMap) -> bool {
        self.as_map() == Some(other)
    }
}

/// Compute a resource's identity.
pub fn resolve_identity(resource: &Resource) -> Result<Identity> {
    let attrs = resource.registry().identity_attrs();
    trace!(resource = resource.resource_name(), ?attrs, "Resolving identity");

    if let [single] = attrs.as_slice() {
        return Ok(Identity::Scalar(resource.get(single)?));
    }

    let mut map = PropertyMap::new();
    for name in &attrs {
        if resource.is_set(name)? {
            map.insert(name.as_str(), resource.get(name)?);
        }
    }
    Ok(Identity::Composite(map))
}

/// Compute a resource's desired state.
pub fn resolve_state(resource: &Resource) -> Result<PropertyMap> {
    let attrs = resource.registry().state_attrs();
    trace!(resource = resource.resource_name(), ?attrs, "Resolving state");

    let mut map = PropertyMap::new();
    for name in &attrs {
        map.insert(name.as_str(), resource.get(name)?);
    }
    Ok(map)
}
