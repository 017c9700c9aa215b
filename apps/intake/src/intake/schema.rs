//! Schema descriptors for map-shaped records.
//!
//! Every record shape in the intake cycle is checked against an explicit
//! [`Schema`]: required fields with typed constraints, unknown fields always
//! rejected. Violations for one record are collected in full and reported in
//! a deterministic order.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Typed constraint for a single schema field.
#[derive(Debug, Clone, Copy)]
pub enum FieldType {
    /// String field. `non_empty` rejects "" (after the caller's trimming);
    /// `one_of` restricts the value to a fixed set.
    Str {
        non_empty: bool,
        one_of: Option<&'static [&'static str]>,
    },
    /// Integer field with inclusive bounds. Floats are a type error.
    Int { min: i64, max: i64 },
    /// Float field with inclusive bounds. Integers coerce.
    Float { min: f64, max: f64 },
    /// Any JSON object.
    Object,
}

impl FieldType {
    fn expected(&self) -> &'static str {
        match self {
            FieldType::Str { .. } => "string",
            FieldType::Int { .. } => "integer",
            FieldType::Float { .. } => "float",
            FieldType::Object => "object",
        }
    }
}

/// One named field of a record schema. All fields are required.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
}

/// A strict record schema: the listed fields, nothing more, nothing less.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    /// Record name used in error reports, e.g. `"structured_input"`.
    pub record: &'static str,
    pub fields: &'static [FieldSpec],
}

/// The constraint a field value violated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Constraint {
    /// Required field absent from the record.
    Missing,
    /// Value has the wrong JSON type.
    Type { expected: String },
    /// Empty string where a non-empty value is required.
    NonEmpty,
    /// Integer outside its inclusive bounds.
    IntRange { min: i64, max: i64 },
    /// Float outside its inclusive bounds.
    FloatRange { min: f64, max: f64 },
    /// String outside its fixed allowed set.
    OneOf { allowed: Vec<String> },
    /// Field not declared by the schema.
    UnknownField,
}

impl std::fmt::Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Constraint::Missing => write!(f, "required field is missing"),
            Constraint::Type { expected } => write!(f, "expected {expected}"),
            Constraint::NonEmpty => write!(f, "must not be empty"),
            Constraint::IntRange { min, max } => write!(f, "must be between {min} and {max}"),
            Constraint::FloatRange { min, max } => write!(f, "must be between {min} and {max}"),
            Constraint::OneOf { allowed } => write!(f, "must be one of [{}]", allowed.join(", ")),
            Constraint::UnknownField => write!(f, "unknown field is not allowed"),
        }
    }
}

/// One field-level schema violation: the field path, the violated
/// constraint, and the type/shape of the rejected value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub constraint: Constraint,
    pub actual: String,
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} (got {})", self.field, self.constraint, self.actual)
    }
}

/// Validation failure for a single record, carrying every violation found in
/// that record. Records are checked stop-on-first-failure, so one error only
/// ever describes one record shape.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{record}: {} field violation(s)", .violations.len())]
pub struct SchemaValidationError {
    pub record: String,
    pub violations: Vec<FieldViolation>,
}

/// Short type/shape description of a rejected value, for error reports.
pub fn value_repr(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("bool({b})"),
        Value::Number(n) if n.as_i64().is_some() => format!("int({n})"),
        Value::Number(n) => format!("float({n})"),
        Value::String(s) if s.is_empty() => "empty string".to_string(),
        Value::String(s) if s.chars().count() > 32 => {
            let head: String = s.chars().take(32).collect();
            format!("str(\"{head}…\")")
        }
        Value::String(s) => format!("str(\"{s}\")"),
        Value::Array(items) => format!("list(len {})", items.len()),
        Value::Object(entries) => format!("object({} keys)", entries.len()),
    }
}

impl Schema {
    /// Checks a record against this schema, collecting every violation:
    /// declared fields in schema order, then unknown fields in record order.
    pub fn check(&self, record: &Map<String, Value>) -> Vec<FieldViolation> {
        let mut violations = Vec::new();

        for spec in self.fields {
            let Some(value) = record.get(spec.name) else {
                violations.push(FieldViolation {
                    field: spec.name.to_string(),
                    constraint: Constraint::Missing,
                    actual: "missing".to_string(),
                });
                continue;
            };
            if let Some(violation) = check_field(spec, value) {
                violations.push(violation);
            }
        }

        for (key, value) in record {
            if !self.fields.iter().any(|spec| spec.name == key.as_str()) {
                violations.push(FieldViolation {
                    field: key.clone(),
                    constraint: Constraint::UnknownField,
                    actual: value_repr(value),
                });
            }
        }

        violations
    }

    /// Like [`Schema::check`], but converts a non-empty violation list into a
    /// [`SchemaValidationError`].
    pub fn validate(&self, record: &Map<String, Value>) -> Result<(), SchemaValidationError> {
        let violations = self.check(record);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(SchemaValidationError {
                record: self.record.to_string(),
                violations,
            })
        }
    }
}

fn check_field(spec: &FieldSpec, value: &Value) -> Option<FieldViolation> {
    let violation = |constraint: Constraint| {
        Some(FieldViolation {
            field: spec.name.to_string(),
            constraint,
            actual: value_repr(value),
        })
    };

    match spec.ty {
        FieldType::Str { non_empty, one_of } => {
            let Value::String(s) = value else {
                return violation(Constraint::Type {
                    expected: spec.ty.expected().to_string(),
                });
            };
            if non_empty && s.is_empty() {
                return violation(Constraint::NonEmpty);
            }
            if let Some(allowed) = one_of {
                if !s.is_empty() && !allowed.contains(&s.as_str()) {
                    return violation(Constraint::OneOf {
                        allowed: allowed.iter().map(|a| a.to_string()).collect(),
                    });
                }
            }
            None
        }
        FieldType::Int { min, max } => {
            let Some(n) = value.as_i64() else {
                return violation(Constraint::Type {
                    expected: spec.ty.expected().to_string(),
                });
            };
            if n < min || n > max {
                return violation(Constraint::IntRange { min, max });
            }
            None
        }
        FieldType::Float { min, max } => {
            let Some(n) = value.as_f64() else {
                return violation(Constraint::Type {
                    expected: spec.ty.expected().to_string(),
                });
            };
            if n < min || n > max {
                return violation(Constraint::FloatRange { min, max });
            }
            None
        }
        FieldType::Object => {
            if value.is_object() {
                None
            } else {
                violation(Constraint::Type {
                    expected: spec.ty.expected().to_string(),
                })
            }
        }
    }
}
