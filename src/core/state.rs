//! The `State` bound for machine state.
//!
//! Machine state is plain data. The engine clones it into drafts, shares
//! finished snapshots behind `Rc`, and round-trips it through `serde_json`
//! when shallow-merging partial updates.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// Trait for values that can be held as machine state.
///
/// Implemented automatically for every type that satisfies the bounds.
///
/// # Required Traits
///
/// - `Clone`: each dispatch edits a private draft cloned from the snapshot
/// - `PartialEq`: merges check that the state survives its JSON form
/// - `Debug`: states must be debuggable for diagnostics
/// - `Serialize` + `DeserializeOwned`: partial updates are merged on the
///   JSON representation, and schemas inspect it
///
/// Shallow merging only works for states that serialize to a JSON object
/// (structs and maps) and round-trip through `serde_json` losslessly.
/// Fields marked `#[serde(skip)]` or holding non-finite floats make
/// return-style updates fail with `MergeError::Lossy`.
///
/// Snapshots are shared, not copied. A state with interior mutability
/// (`Cell`, `RefCell`) lets a holder of a snapshot change what the machine
/// sees, so keep such fields out of machine state.
///
/// # Example
///
/// ```rust
/// use statewise::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// struct Counter {
///     count: u32,
/// }
///
/// fn takes_state<S: State>(_state: &S) {}
///
/// takes_state(&Counter { count: 0 });
/// ```
pub trait State: Clone + PartialEq + Debug + Serialize + DeserializeOwned + 'static {}

impl<T> State for T where T: Clone + PartialEq + Debug + Serialize + DeserializeOwned + 'static {}
