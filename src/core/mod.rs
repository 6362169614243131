//! Core machine vocabulary.
//!
//! This module contains the data the engine works with:
//! - The `State` bound for machine state
//! - The ordered event set binding event names to updaters
//! - The transition table declaring which events may follow which
//! - The `Update` protocol updaters use to hand back their result
//!
//! Nothing here performs I/O or holds shared mutable state.

mod events;
mod patch;
mod state;
mod transitions;
mod update;

pub use events::{EventSet, Updater};
pub use patch::{MergeError, Patch};
pub use state::State;
pub use transitions::TransitionTable;
pub use update::Update;
