//! Type constraints for properties.
//!
//! A constraint describes which values a property accepts. It is checked on
//! every explicit set, after coercion, and never on reads or defaults.
//!
//! | Constraint | Accepts |
//! |------------|---------|
//! | `Kind(String)` | text values only |
//! | `Kind(Number)` | integers and floats |
//! | `OneOf([..])` | exactly one of the listed values |
//! | `AnyOf([..])` | anything one of the alternatives accepts (`[String, nil]`) |
//! | `Predicate` | whatever the callback says yes to |

use std::fmt;
use std::sync::Arc;

use crate::value::Value;

/// The structural kind of a [`Value`].
///
/// `Number` is abstract: no value has kind `Number`, but a `Kind(Number)`
/// constraint accepts both integers and floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Nil,
    Bool,
    Integer,
    Float,
    Number,
    String,
    List,
    Map,
}

impl ValueKind {
    /// Whether a value of kind `found` satisfies this kind.
    pub fn accepts(self, found: ValueKind) -> bool {
        match self {
            ValueKind::Number => matches!(found, ValueKind::Integer | ValueKind::Float),
            kind => kind == found,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Nil => "nil",
            ValueKind::Bool => "Bool",
            ValueKind::Integer => "Integer",
            ValueKind::Float => "Float",
            ValueKind::Number => "Number",
            ValueKind::String => "String",
            ValueKind::List => "List",
            ValueKind::Map => "Map",
        };
        write!(f, "{}", name)
    }
}

pub type PredicateFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// What a property accepts on explicit set.
#[derive(Clone)]
pub enum TypeConstraint {
    Kind(ValueKind),
    OneOf(Vec<Value>),
    AnyOf(Vec<TypeConstraint>),
    Predicate {
        description: String,
        check: PredicateFn,
    },
}

impl TypeConstraint {
    pub fn string() -> Self {
        TypeConstraint::Kind(ValueKind::String)
    }

    pub fn integer() -> Self {
        TypeConstraint::Kind(ValueKind::Integer)
    }

    pub fn number() -> Self {
        TypeConstraint::Kind(ValueKind::Number)
    }

    pub fn bool() -> Self {
        TypeConstraint::Kind(ValueKind::Bool)
    }

    pub fn list() -> Self {
        TypeConstraint::Kind(ValueKind::List)
    }

    pub fn map() -> Self {
        TypeConstraint::Kind(ValueKind::Map)
    }

    pub fn one_of<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        TypeConstraint::OneOf(values.into_iter().map(Into::into).collect())
    }

    pub fn any_of(alternatives: impl IntoIterator<Item = TypeConstraint>) -> Self {
        TypeConstraint::AnyOf(alternatives.into_iter().collect())
    }

    /// This constraint, or nil.
    pub fn nilable(self) -> Self {
        TypeConstraint::AnyOf(vec![self, TypeConstraint::Kind(ValueKind::Nil)])
    }

    pub fn predicate(
        description: impl Into<String>,
        check: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        TypeConstraint::Predicate {
            description: description.into(),
            check: Arc::new(check),
        }
    }

    /// Check a value against this constraint.
    pub fn check(&self, value: &Value) -> Result<(), ConstraintViolation> {
        if self.accepts(value) {
            return Ok(());
        }
        Err(match self {
            TypeConstraint::Predicate { description, .. } => ConstraintViolation::Rejected {
                rule: description.clone(),
                value: value.to_string(),
            },
            _ => ConstraintViolation::Mismatch {
                expected: self.to_string(),
                found: value.kind(),
                value: value.to_string(),
            },
        })
    }

    fn accepts(&self, value: &Value) -> bool {
        match self {
            TypeConstraint::Kind(kind) => kind.accepts(value.kind()),
            TypeConstraint::OneOf(allowed) => allowed.contains(value),
            TypeConstraint::AnyOf(alternatives) => alternatives.iter().any(|c| c.accepts(value)),
            TypeConstraint::Predicate { check, .. } => check(value),
        }
    }
}

impl fmt::Display for TypeConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeConstraint::Kind(kind) => write!(f, "{}", kind),
            TypeConstraint::OneOf(allowed) => {
                write!(f, "one of ")?;
                write!(f, "{}", Value::List(allowed.clone()))
            }
            TypeConstraint::AnyOf(alternatives) => {
                for (i, alt) in alternatives.iter().enumerate() {
                    if i > 0 {
                        write!(f, " or ")?;
                    }
                    write!(f, "{}", alt)?;
                }
                Ok(())
            }
            TypeConstraint::Predicate { description, .. } => write!(f, "{}", description),
        }
    }
}

impl fmt::Debug for TypeConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeConstraint({})", self)
    }
}

impl From<ValueKind> for TypeConstraint {
    fn from(kind: ValueKind) -> Self {
        TypeConstraint::Kind(kind)
    }
}

/// Why a value was rejected by a [`TypeConstraint`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintViolation {
    /// The value's kind (or exact value) is not what the constraint allows.
    Mismatch {
        expected: String,
        found: ValueKind,
        value: String,
    },
    /// A predicate callback said no.
    Rejected { rule: String, value: String },
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintViolation::Mismatch {
                expected,
                found,
                value,
            } => write!(
                f,
                "expected {}, got {} ({})",
                expected, value, found
            ),
            ConstraintViolation::Rejected { rule, value } => {
                write!(f, "{} does not satisfy '{}'", value, rule)
            }
        }
    }
}

impl std::error::Error for ConstraintViolation {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_rejects_non_text() {
        assert!(TypeConstraint::string().check(&Value::from("ok")).is_ok());
        let err = TypeConstraint::string().check(&Value::from(12)).unwrap_err();
        assert_eq!(
            err,
            ConstraintViolation::Mismatch {
                expected: "String".into(),
                found: ValueKind::Integer,
                value: "12".into(),
            }
        );
    }

    #[test]
    fn number_accepts_integers_and_floats() {
        let c = TypeConstraint::number();
        assert!(c.check(&Value::from(1)).is_ok());
        assert!(c.check(&Value::from(1.5)).is_ok());
        assert!(c.check(&Value::from("1")).is_err());
    }

    #[test]
    fn nilable_accepts_nil() {
        let c = TypeConstraint::string().nilable();
        assert!(c.check(&Value::Nil).is_ok());
        assert!(c.check(&Value::from("x")).is_ok());
        assert!(c.check(&Value::from(true)).is_err());
        assert_eq!(c.to_string(), "String or nil");
    }

    #[test]
    fn one_of_matches_exact_values() {
        let c = TypeConstraint::one_of(["create", "delete"]);
        assert!(c.check(&Value::from("create")).is_ok());
        assert!(c.check(&Value::from("touch")).is_err());
        assert_eq!(c.to_string(), "one of [create, delete]");
    }

    #[test]
    fn predicate_reports_its_rule() {
        let c = TypeConstraint::predicate("a valid port", |v| {
            v.as_i64().is_some_and(|p| (1..=65535).contains(&p))
        });
        assert!(c.check(&Value::from(80)).is_ok());
        let err = c.check(&Value::from(0)).unwrap_err();
        assert_eq!(err.to_string(), "0 does not satisfy 'a valid port'");
    }
}
