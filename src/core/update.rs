//! What an updater hands back to the engine.
//!
//! Every updater receives a mutable draft of the current state. Its return
//! value tells the engine how to finish the draft:
//!
//! | updater returns                    | engine does                               |
//! |------------------------------------|-------------------------------------------|
//! | `()` / `Value::Null` / `Update::Draft` | keeps the draft as edited in place    |
//! | a `Map`, an object `Value`, a `Patch`  | shallow-merges its keys onto the draft |
//! | `Update::with(f)`                  | calls `f(&mut draft)`, keeps the draft    |
//!
//! The finished draft becomes the next immutable snapshot.

use super::patch::{MergeError, Patch};
use super::state::State;
use serde_json::{Map, Value};
use std::fmt;

/// Result of running an updater against a draft.
pub enum Update<S> {
    /// The updater edited the draft in place.
    Draft,

    /// Shallow-merge these keys onto the draft.
    Merge(Patch),

    /// Run this continuation against the draft.
    Continue(Box<dyn FnOnce(&mut S)>),
}

impl<S> Update<S> {
    /// Merge a serializable partial state.
    pub fn merge<T: serde::Serialize>(partial: T) -> Self {
        Update::Merge(Patch::new(partial))
    }

    /// Defer the edit to a continuation that receives the draft.
    pub fn with<F>(edit: F) -> Self
    where
        F: FnOnce(&mut S) + 'static,
    {
        Update::Continue(Box::new(edit))
    }

    /// Run the update against `draft`, yielding the finished state.
    pub(crate) fn finish(self, mut draft: S) -> Result<S, MergeError>
    where
        S: State,
    {
        match self {
            Update::Draft => Ok(draft),
            Update::Merge(patch) => patch.apply(&draft),
            Update::Continue(edit) => {
                edit(&mut draft);
                Ok(draft)
            }
        }
    }
}

impl<S> From<()> for Update<S> {
    fn from(_: ()) -> Self {
        Update::Draft
    }
}

impl<S> From<Patch> for Update<S> {
    fn from(patch: Patch) -> Self {
        Update::Merge(patch)
    }
}

impl<S> From<Map<String, Value>> for Update<S> {
    fn from(map: Map<String, Value>) -> Self {
        Update::Merge(Patch::from(map))
    }
}

impl<S> From<Value> for Update<S> {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Update::Draft,
            other => Update::Merge(Patch::from_value(other)),
        }
    }
}

impl<S> fmt::Debug for Update<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Update::Draft => f.write_str("Draft"),
            Update::Merge(patch) => f.debug_tuple("Merge").field(patch).finish(),
            Update::Continue(_) => f.write_str("Continue(..)"),
        }
    }
}
