//! Optional schema validation of the initial state.

use serde_json::Value;
use std::fmt;

/// Diagnostic returned by a schema that rejects a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaIssue {
    pub message: String,
}

impl SchemaIssue {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A validator that attempts to parse a value.
///
/// The builder hands it the JSON form of the initial state once, before
/// the transition table is checked. Success carries the validated data,
/// failure a diagnostic message.
///
/// Implemented for closures of the matching shape:
///
/// ```rust
/// use statewise::builder::{Schema, SchemaIssue};
/// use serde_json::{json, Value};
///
/// let has_count = |value: &Value| match value.get("count") {
///     Some(count) if count.is_u64() => Ok(value.clone()),
///     _ => Err(SchemaIssue::new("count must be a non-negative integer")),
/// };
///
/// assert!(has_count.safe_parse(&json!({ "count": 1 })).is_ok());
/// assert!(has_count.safe_parse(&json!({ "count": -1 })).is_err());
/// ```
pub trait Schema {
    fn safe_parse(&self, value: &Value) -> Result<Value, SchemaIssue>;
}

impl<F> Schema for F
where
    F: Fn(&Value) -> Result<Value, SchemaIssue>,
{
    fn safe_parse(&self, value: &Value) -> Result<Value, SchemaIssue> {
        self(value)
    }
}
