//! Declarative request schemas and validation.
//!
//! - **field**: field kinds and the builder used to declare them
//! - **validate**: [`Schema`], [`ValidatedRequest`] and the validation pass
//! - **registry**: the schema of every forwarded operation

mod field;
pub mod registry;
mod validate;


pub use field::{Field, FieldKind};
pub use validate::{Issue, Schema, ValidatedRequest, ValidationError};

/// Loosely-typed parameters exactly as a transport shell received them.
pub type RawInput = serde_json::Map<String, serde_json::Value>;
