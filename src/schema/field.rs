//! Field declarations for operation schemas.

use serde_json::{Value, json};

/// Kind of value a field accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// UTF-8 string with optional character-count bounds
    String {
        min: Option<usize>,
        max: Option<usize>,
    },
    /// Hyphenated UUID string
    Uuid,
    /// String restricted to a closed set of literals
    Enum(&'static [&'static str]),
    /// Any JSON number
    Number,
    /// JSON number without a fractional part
    Integer,
    Boolean,
    /// UTC RFC 3339 timestamp (`2025-01-01T00:00:00Z`, fractional seconds allowed)
    DateTime,
    /// Array of UUID strings
    UuidArray,
    /// Array of plain strings
    StringArray,
}

impl FieldKind {
    /// Whether the kind is array-typed and therefore subject to coercion.
    pub fn is_array(&self) -> bool {
        matches!(self, FieldKind::UuidArray | FieldKind::StringArray)
    }
}

/// Custom messages that replace the generic reasons for a field.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Messages {
    pub(crate) too_short: Option<&'static str>,
    pub(crate) too_long: Option<&'static str>,
    pub(crate) invalid: Option<&'static str>,
}

/// A single declared field of an operation schema.
///
/// Built with a small builder API:
///
/// ```
/// use taskbridge::schema::Field;
///
/// let title = Field::string("title", "Task title")
///     .required()
///     .min_len(1, "Title is required")
///     .max_len(255, "Title too long");
/// assert!(title.is_required());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub(crate) name: &'static str,
    pub(crate) kind: FieldKind,
    pub(crate) required: bool,
    pub(crate) default: Option<Value>,
    pub(crate) description: &'static str,
    pub(crate) messages: Messages,
}

impl Field {
    fn new(name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: false,
            default: None,
            description,
            messages: Messages::default(),
        }
    }

    pub fn string(name: &'static str, description: &'static str) -> Self {
        Self::new(
            name,
            FieldKind::String {
                min: None,
                max: None,
            },
            description,
        )
    }

    pub fn uuid(name: &'static str, description: &'static str) -> Self {
        Self::new(name, FieldKind::Uuid, description)
    }

    pub fn enumeration(
        name: &'static str,
        values: &'static [&'static str],
        description: &'static str,
    ) -> Self {
        Self::new(name, FieldKind::Enum(values), description)
    }

    pub fn number(name: &'static str, description: &'static str) -> Self {
        Self::new(name, FieldKind::Number, description)
    }

    pub fn integer(name: &'static str, description: &'static str) -> Self {
        Self::new(name, FieldKind::Integer, description)
    }

    pub fn boolean(name: &'static str, description: &'static str) -> Self {
        Self::new(name, FieldKind::Boolean, description)
    }

    pub fn datetime(name: &'static str, description: &'static str) -> Self {
        Self::new(name, FieldKind::DateTime, description)
    }

    pub fn uuid_array(name: &'static str, description: &'static str) -> Self {
        Self::new(name, FieldKind::UuidArray, description)
    }

    pub fn string_array(name: &'static str, description: &'static str) -> Self {
        Self::new(name, FieldKind::StringArray, description)
    }

    /// Mark the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Value applied when the field is absent (or `null`).
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Minimum character count, with the message reported when violated.
    pub fn min_len(mut self, min: usize, message: &'static str) -> Self {
        if let FieldKind::String { min: ref mut m, .. } = self.kind {
            *m = Some(min);
        }
        self.messages.too_short = Some(message);
        self
    }

    /// Maximum character count, with the message reported when violated.
    pub fn max_len(mut self, max: usize, message: &'static str) -> Self {
        if let FieldKind::String { max: ref mut m, .. } = self.kind {
            *m = Some(max);
        }
        self.messages.too_long = Some(message);
        self
    }

    /// Message reported when the value has the right type but a bad format
    /// (malformed UUID, unparsable timestamp).
    pub fn invalid_message(mut self, message: &'static str) -> Self {
        self.messages.invalid = Some(message);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    /// JSON-Schema fragment advertised in operation catalogs.
    pub fn json_schema(&self) -> Value {
        let mut schema = match &self.kind {
            FieldKind::String { min, max } => {
                let mut s = json!({ "type": "string" });
                if let Some(min) = min {
                    s["minLength"] = json!(min);
                }
                if let Some(max) = max {
                    s["maxLength"] = json!(max);
                }
                s
            }
            FieldKind::Uuid => json!({ "type": "string", "format": "uuid" }),
            FieldKind::Enum(values) => json!({ "type": "string", "enum": values }),
            FieldKind::Number => json!({ "type": "number" }),
            FieldKind::Integer => json!({ "type": "integer" }),
            FieldKind::Boolean => json!({ "type": "boolean" }),
            FieldKind::DateTime => json!({ "type": "string", "format": "date-time" }),
            FieldKind::UuidArray => json!({
                "type": "array",
                "items": { "type": "string", "format": "uuid" }
            }),
            FieldKind::StringArray => json!({
                "type": "array",
                "items": { "type": "string" }
            }),
        };

        schema["description"] = json!(self.description);
        if let Some(default) = &self.default {
            schema["default"] = default.clone();
        }
        schema
    }
}
