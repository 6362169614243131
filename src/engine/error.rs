//! Dispatch errors.

use crate::core::MergeError;
use thiserror::Error;

/// Errors that can occur when dispatching an event.
///
/// A failed dispatch leaves the state, the current event and the
/// listeners exactly as they were.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DispatchError {
    #[error("Unknown event '{event}'. Declared events: {}", known.join(", "))]
    UnknownEvent { event: String, known: Vec<String> },

    #[error(
        "Invalid transition from '{current}' to '{event}'. Valid next events: {}",
        allowed.join(", ")
    )]
    InvalidTransition {
        event: String,
        current: String,
        allowed: Vec<String>,
    },

    #[error("Cannot dispatch '{event}' while '{active}' is still being dispatched")]
    Reentrant { event: String, active: String },

    #[error("Cannot reset while the updater for '{active}' is running")]
    ResetDuringUpdate { active: String },

    #[error("Event '{event}' produced an update that could not be merged: {source}")]
    MergeFailed {
        event: String,
        #[source]
        source: MergeError,
    },
}

impl DispatchError {
    /// Name of the event whose dispatch failed. For a rejected reset,
    /// the event being dispatched at the time.
    pub fn event(&self) -> &str {
        match self {
            Self::ResetDuringUpdate { active } => active,
            Self::UnknownEvent { event, .. }
            | Self::InvalidTransition { event, .. }
            | Self::Reentrant { event, .. }
            | Self::MergeFailed { event, .. } => event,
        }
    }
}
