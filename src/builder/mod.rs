//! Construction-time validation and the builder API.
//!
//! Machines are only ever created through [`MachineBuilder::build`], which
//! rejects structurally invalid configurations before anything exists:
//! a transition table naming undeclared events, or an initial state an
//! optional [`Schema`] refuses. Either a fully valid machine comes back or
//! an error does.

pub mod error;
pub mod machine;
pub mod macros;
pub mod schema;

pub use error::{BuildError, Reference};
pub use machine::MachineBuilder;
pub use schema::{Schema, SchemaIssue};
