//! Build errors for the machine builder.

use std::fmt;
use thiserror::Error;

/// Where a transition table mentions an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// As an entry key.
    Key,

    /// In the successor list of the entry for `of`.
    Successor { of: String },
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key => f.write_str("a transition key"),
            Self::Successor { of } => write!(f, "a successor of '{of}'"),
        }
    }
}

/// Errors that can occur when building a machine.
///
/// No machine exists when `build` returns one of these.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("Initial state failed schema validation: {message}")]
    InitialStateValidation { message: String },

    #[error(
        "Transition table references unknown event '{event}' as {reference}. Valid events: {}",
        valid.join(", ")
    )]
    UnknownEventReference {
        event: String,
        reference: Reference,
        valid: Vec<String>,
    },
}
