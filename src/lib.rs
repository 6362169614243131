//! Statewise: a small embeddable event-driven state machine
//!
//! A machine holds one piece of state and changes it only through named
//! events. Each event is bound to an updater, and a transition table says
//! which events may legally follow which. The table is checked against the
//! declared events once, when the machine is built.
//!
//! # Core Concepts
//!
//! - **Events**: named triggers bound to updaters
//! - **Updaters**: edit a draft of the state in place, or return a partial
//!   state to shallow-merge (see [`core::Update`])
//! - **Transition table**: per event, the events allowed next; an empty or
//!   missing list means any event may follow
//! - **Snapshots**: every successful dispatch produces one new immutable
//!   state snapshot and notifies all listeners with it
//!
//! # Example
//!
//! ```rust
//! use statewise::{transitions, MachineBuilder};
//! use serde::{Deserialize, Serialize};
//! use serde_json::{json, Value};
//!
//! #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
//! struct Todos {
//!     items: Vec<String>,
//!     saving: bool,
//! }
//!
//! let machine = MachineBuilder::new()
//!     .initial(Todos { items: vec![], saving: false })
//!     .event("add", |draft: &mut Todos, item: Option<&Value>| {
//!         if let Some(text) = item.and_then(Value::as_str) {
//!             draft.items.push(text.to_string());
//!         }
//!     })
//!     .event("save", |_: &mut Todos, _| json!({ "saving": true }))
//!     .event("saved", |_: &mut Todos, _| json!({ "saving": false }))
//!     .transitions(transitions! {
//!         "add" => [],
//!         "save" => ["saved"],
//!         "saved" => [],
//!     })
//!     .build()
//!     .unwrap();
//!
//! machine.dispatch_with("add", json!("write docs")).unwrap();
//! machine.dispatch("save").unwrap();
//! assert!(machine.dispatch("add").is_err());
//! assert_eq!(machine.valid_next_events(), ["saved"]);
//! ```

pub mod builder;
pub mod core;
pub mod engine;

// Re-export commonly used types
pub use builder::{BuildError, MachineBuilder, Schema, SchemaIssue};
pub use crate::core::{Patch, State, TransitionTable, Update};
pub use engine::{DispatchError, Listener, Machine, MachineId, Subscription};
