//! The mutation and validation engine.
//!
//! A [`Machine`] owns the current state snapshot, the declared events, the
//! transition table, the current event and its listeners. It is the only
//! place state changes, and only through [`Machine::dispatch`].
//!
//! # Dispatch contract
//!
//! 1. The event must be declared, or the call fails with `UnknownEvent`.
//! 2. With a current event, the event must be one of its successors unless
//!    that successor list is empty. The first dispatch after construction
//!    or reset is never transition-checked.
//! 3. The updater runs against a private draft; its [`Update`](crate::core::Update)
//!    decides how the draft is finished.
//! 4. The finished draft becomes the new snapshot, the event becomes
//!    current, and listeners are called with the snapshot.
//!
//! Any failure leaves the machine exactly as it was.

mod error;
mod listeners;
mod machine;

pub use error::DispatchError;
pub use listeners::{Listener, Subscription};
pub use machine::{Machine, MachineId};
