//! Repair of string-encoded arrays.
//!
//! Some MCP clients cannot send nested arrays in tool arguments and pass
//! them as JSON text instead (`"[\"a\",\"b\"]"`). Before validation, every
//! array-typed field of the target schema is given one chance to be parsed
//! back into an array. Anything that does not parse into an array is left
//! exactly as received, so validation reports it.

use serde_json::Value;
use tracing::debug;

use crate::schema::RawInput;

#[cfg(test)]
#[path = "coerce_test.rs"]
mod coerce_test;

/// Return a copy of `input` with string-encoded arrays decoded for the
/// given field names.
pub fn coerce_array_fields(input: &RawInput, array_fields: &[&str]) -> RawInput {
    let mut output = input.clone();

    for field in array_fields {
        let Some(Value::String(encoded)) = output.get(*field) else {
            continue;
        };

        match serde_json::from_str::<Value>(encoded) {
            Ok(decoded @ Value::Array(_)) => {
                debug!(field, "decoded string-encoded array parameter");
                output.insert((*field).to_string(), decoded);
            }
            _ => debug!(field, "string parameter is not an encoded array, leaving as is"),
        }
    }

    output
}
