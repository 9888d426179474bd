//! Coercion and validation of incoming values.
//!
//! Runs on every explicit set, in this order:
//!
//! 1. **Coerce**: the descriptor's coercion, or identity if none is configured.
//! 2. **Validate**: the coerced value against the descriptor's constraint.
//!    No constraint means anything is accepted.
//!
//! Reads and defaults never pass through here; defaults are trusted.

use super::constraint::{ConstraintViolation, TypeConstraint};
use super::descriptor::PropertyDescriptor;
use crate::error::{PropError, Result};
use crate::value::Value;

/// Apply the descriptor's coercion, if any.
pub fn coerce(descriptor: &PropertyDescriptor, raw: Value) -> Value {
    match descriptor.coercion() {
        Some(coercion) => coercion.apply(raw),
        None => raw,
    }
}

/// Check a (coerced) value against an optional constraint.
pub fn validate(
    value: &Value,
    constraint: Option<&TypeConstraint>,
) -> std::result::Result<(), ConstraintViolation> {
    match constraint {
        Some(constraint) => constraint.check(value),
        None => Ok(()),
    }
}

/// Coerce then validate, producing the value to store.
///
/// `resource` only labels the error.
pub fn coerce_and_validate(
    resource: &str,
    descriptor: &PropertyDescriptor,
    raw: Value,
) -> Result<Value> {
    let value = coerce(descriptor, raw);
    validate(&value, descriptor.constraint()).map_err(|reason| PropError::ValidationFailed {
        resource: resource.to_string(),
        property: descriptor.name().to_string(),
        reason,
    })?;
    Ok(value)
}
