use thiserror::Error;

use crate::property::ConstraintViolation;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropError {
    #[error("{resource}.{property}: validation failed: {reason}")]
    ValidationFailed {
        resource: String,
        property: String,
        reason: ConstraintViolation,
    },

    #[error("Deprecated feature: {0}")]
    DeprecatedFeature(String),

    #[error("{resource} has no property named '{property}'")]
    UnknownProperty { resource: String, property: String },
}

impl PropError {
    pub(crate) fn unknown(resource: &str, property: &str) -> Self {
        PropError::UnknownProperty {
            resource: resource.to_string(),
            property: property.to_string(),
        }
    }

    /// True for `ValidationFailed`, regardless of which constraint tripped.
    pub fn is_validation_failure(&self) -> bool {
        matches!(self, PropError::ValidationFailed { .. })
    }
}

pub type Result<T> = std::result::Result<T, PropError>;
