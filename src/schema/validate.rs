//! Schema definition and validation.
//!
//! A [`Schema`] is an ordered list of [`Field`]s. Validation walks every
//! field, collects every failure, and only produces a [`ValidatedRequest`]
//! when nothing failed. Undeclared keys are dropped from the validated
//! payload so the forwarded body matches the declared shape exactly.

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use thiserror::Error;
use uuid::Uuid;

use super::RawInput;
use super::field::{Field, FieldKind};

/// One failed check: the offending field path and the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub path: String,
    pub reason: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}

/// Every failure found while validating one input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Validation failed: {}", join_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<Issue>,
}

fn join_issues(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(Issue::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Input that passed schema validation.
///
/// Only [`Schema::validate`] can construct one. It holds the declared
/// fields that were supplied, plus defaults for the ones that were not.
/// An explicit `null` is only accepted on fields with a default.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    fields: Map<String, Value>,
}

impl ValidatedRequest {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }

    /// Deserialize into a typed request body.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.fields))
    }
}

/// Declarative validation rules for one operation's input.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Append every field of `other` after the fields already declared.
    pub fn merge(mut self, other: &Schema) -> Self {
        self.fields.extend(other.fields.iter().cloned());
        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    /// Names of the array-typed fields (the ones coercion repairs).
    pub fn array_fields(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|f| f.kind.is_array())
            .map(|f| f.name)
            .collect()
    }

    /// Validate `input`, reporting every failing field at once.
    pub fn validate(&self, input: &RawInput) -> Result<ValidatedRequest, ValidationError> {
        let mut issues = Vec::new();
        let mut fields = Map::new();

        for field in &self.fields {
            match (input.get(field.name), &field.default) {
                // `null` only stands in for "absent" when a default exists
                (None | Some(Value::Null), Some(default)) => {
                    fields.insert(field.name.to_string(), default.clone());
                }
                (None, None) => {
                    if field.required {
                        issues.push(Issue {
                            path: field.name.to_string(),
                            reason: "Required".to_string(),
                        });
                    }
                }
                (Some(value), _) => {
                    let before = issues.len();
                    check_value(field, field.name, value, &mut issues);
                    if issues.len() == before {
                        fields.insert(field.name.to_string(), value.clone());
                    }
                }
            }
        }

        if issues.is_empty() {
            Ok(ValidatedRequest { fields })
        } else {
            Err(ValidationError { issues })
        }
    }

    /// JSON-Schema object describing this input.
    pub fn json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for field in &self.fields {
            properties.insert(field.name.to_string(), field.json_schema());
            if field.required {
                required.push(field.name);
            }
        }

        let mut schema = json!({
            "type": "object",
            "properties": properties,
        });
        if !required.is_empty() {
            schema["required"] = json!(required);
        }
        schema
    }
}

fn check_value(field: &Field, path: &str, value: &Value, issues: &mut Vec<Issue>) {
    let mut fail = |reason: String| {
        issues.push(Issue {
            path: path.to_string(),
            reason,
        })
    };

    match &field.kind {
        FieldKind::String { min, max } => {
            let Some(s) = value.as_str() else {
                return fail(type_mismatch("string", value));
            };
            let len = s.chars().count();
            if let Some(min) = min
                && len < *min
            {
                return fail(field.messages.too_short.map_or_else(
                    || format!("String must contain at least {min} character(s)"),
                    str::to_string,
                ));
            }
            if let Some(max) = max
                && len > *max
            {
                fail(field.messages.too_long.map_or_else(
                    || format!("String must contain at most {max} character(s)"),
                    str::to_string,
                ));
            }
        }
        FieldKind::Uuid => {
            let Some(s) = value.as_str() else {
                return fail(type_mismatch("string", value));
            };
            if !is_uuid(s) {
                fail(field.messages.invalid.unwrap_or("Invalid uuid").to_string());
            }
        }
        FieldKind::Enum(allowed) => {
            let Some(s) = value.as_str() else {
                return fail(type_mismatch("string", value));
            };
            if !allowed.contains(&s) {
                let expected = allowed
                    .iter()
                    .map(|v| format!("'{v}'"))
                    .collect::<Vec<_>>()
                    .join(" | ");
                fail(format!(
                    "Invalid enum value. Expected {expected}, received '{s}'"
                ));
            }
        }
        FieldKind::Number => {
            if !value.is_number() {
                fail(type_mismatch("number", value));
            }
        }
        FieldKind::Integer => {
            if !value.is_number() {
                fail(type_mismatch("integer", value));
            } else if value.is_u64() && !value.is_i64() {
                fail(format!("Number must be less than or equal to {}", i64::MAX));
            } else if !value.is_i64() {
                fail("Expected integer, received float".to_string());
            }
        }
        FieldKind::Boolean => {
            if !value.is_boolean() {
                fail(type_mismatch("boolean", value));
            }
        }
        FieldKind::DateTime => {
            let Some(s) = value.as_str() else {
                return fail(type_mismatch("string", value));
            };
            if !is_utc_datetime(s) {
                fail(
                    field
                        .messages
                        .invalid
                        .unwrap_or("Invalid datetime")
                        .to_string(),
                );
            }
        }
        FieldKind::UuidArray | FieldKind::StringArray => {
            let Some(items) = value.as_array() else {
                return fail(type_mismatch("array", value));
            };
            for (index, item) in items.iter().enumerate() {
                let item_path = format!("{path}.{index}");
                match item.as_str() {
                    None => issues.push(Issue {
                        path: item_path,
                        reason: type_mismatch("string", item),
                    }),
                    Some(s) if field.kind == FieldKind::UuidArray && !is_uuid(s) => {
                        issues.push(Issue {
                            path: item_path,
                            reason: "Invalid uuid".to_string(),
                        })
                    }
                    Some(_) => {}
                }
            }
        }
    }
}

/// Strict hyphenated form only; `Uuid::parse_str` alone also accepts
/// braced, URN and simple forms.
fn is_uuid(s: &str) -> bool {
    s.len() == 36 && Uuid::try_parse(s).is_ok()
}

/// `YYYY-MM-DDTHH:MM:SS[.fff]Z` only. Offsets, lowercase `t`/`z` and the
/// space separator that RFC 3339 otherwise allows are rejected.
fn is_utc_datetime(s: &str) -> bool {
    s.as_bytes().get(10) == Some(&b'T')
        && s.ends_with('Z')
        && chrono::DateTime::parse_from_rfc3339(s).is_ok()
}

fn type_mismatch(expected: &str, received: &Value) -> String {
    format!("Expected {expected}, received {}", json_type(received))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
