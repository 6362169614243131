//! Partial-state patches and the shallow merge.

use super::state::State;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Why a patch could not be merged into a draft.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MergeError {
    #[error("partial update must be an object, found {found}")]
    PatchNotObject { found: &'static str },

    #[error("state must serialize to an object to be merged, found {found}")]
    StateNotObject { found: &'static str },

    #[error("could not serialize: {0}")]
    Serialize(String),

    #[error("merged state no longer matches its type: {0}")]
    Deserialize(String),

    #[error("state does not survive its JSON form unchanged: {reason}")]
    Lossy { reason: String },
}

/// A partial state: top-level keys that overwrite the same keys of the state.
///
/// Nested values are replaced wholesale, never merged recursively.
///
/// The merge runs on the JSON form of the draft, so the state must
/// round-trip losslessly through `serde_json`. Keys the patch does not
/// name keep their values only if they survive that round trip; a state
/// that does not (a `#[serde(skip)]` field, a non-finite float) fails the
/// merge with [`MergeError::Lossy`] rather than losing data.
///
/// # Example
///
/// ```rust
/// use statewise::core::Patch;
/// use serde_json::json;
///
/// let patch = Patch::from_value(json!({ "count": 1 }));
/// assert_eq!(patch.len(), 1);
///
/// // null is an empty patch
/// assert!(Patch::from_value(serde_json::Value::Null).is_empty());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    fields: Result<Map<String, Value>, MergeError>,
}

impl Patch {
    /// Patch from any serializable partial, typically a small struct or `json!` value.
    pub fn new<T: Serialize>(partial: T) -> Self {
        match serde_json::to_value(partial) {
            Ok(value) => Self::from_value(value),
            Err(err) => Self {
                fields: Err(MergeError::Serialize(err.to_string())),
            },
        }
    }

    pub fn from_value(value: Value) -> Self {
        let fields = match value {
            Value::Object(map) => Ok(map),
            Value::Null => Ok(Map::new()),
            other => Err(MergeError::PatchNotObject {
                found: kind(&other),
            }),
        };
        Self { fields }
    }

    /// Number of keys the patch overwrites (zero for an invalid patch).
    pub fn len(&self) -> usize {
        self.fields.as_ref().map_or(0, Map::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shallow-merge onto `draft`, producing the merged state.
    ///
    /// `draft` is left untouched when the merge fails.
    pub(crate) fn apply<S: State>(self, draft: &S) -> Result<S, MergeError> {
        let fields = self.fields?;
        if fields.is_empty() {
            return Ok(draft.clone());
        }

        let mut target = match serde_json::to_value(draft) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                return Err(MergeError::StateNotObject {
                    found: kind(&other),
                })
            }
            Err(err) => return Err(MergeError::Serialize(err.to_string())),
        };
        ensure_lossless(draft, &target)?;
        target.extend(fields);

        serde_json::from_value(Value::Object(target))
            .map_err(|err| MergeError::Deserialize(err.to_string()))
    }
}

impl From<Map<String, Value>> for Patch {
    fn from(map: Map<String, Value>) -> Self {
        Self { fields: Ok(map) }
    }
}

/// Rebuild `draft` from `form`; any field the JSON form drops or cannot
/// carry shows up as a difference.
fn ensure_lossless<S: State>(draft: &S, form: &Map<String, Value>) -> Result<(), MergeError> {
    let rebuilt: S = serde_json::from_value(Value::Object(form.clone())).map_err(|err| {
        MergeError::Lossy {
            reason: err.to_string(),
        }
    })?;

    if rebuilt == *draft {
        Ok(())
    } else {
        Err(MergeError::Lossy {
            reason: format!("{draft:?} comes back as {rebuilt:?}"),
        })
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
