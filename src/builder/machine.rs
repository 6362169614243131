//! Builder for constructing machines.

use crate::builder::error::{BuildError, Reference};
use crate::builder::schema::Schema;
use crate::core::{EventSet, State, TransitionTable, Update};
use crate::engine::Machine;
use serde_json::Value;
use std::fmt;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::debug;

/// Builder for constructing machines with a fluent API.
///
/// `build` validates before anything is created:
/// 1. the initial state was given,
/// 2. the optional schema accepts the initial state,
/// 3. every transition-table key is a declared event,
/// 4. every successor named in the table is a declared event.
///
/// # Example
///
/// ```rust
/// use statewise::builder::MachineBuilder;
/// use serde::{Deserialize, Serialize};
/// use serde_json::json;
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// struct Counter {
///     count: u32,
/// }
///
/// let machine = MachineBuilder::new()
///     .initial(Counter { count: 0 })
///     .event("increment", |s: &mut Counter, _| json!({ "count": s.count + 1 }))
///     .transition("increment", ["increment"])
///     .build()
///     .unwrap();
///
/// machine.dispatch("increment").unwrap();
/// assert_eq!(machine.state().count, 1);
/// ```
pub struct MachineBuilder<S: State, P = Value> {
    initial: Option<S>,
    events: EventSet<S, P>,
    transitions: TransitionTable,
    schema: Option<Box<dyn Schema>>,
}

impl<S: State> MachineBuilder<S> {
    /// Create a builder for machines with JSON payloads.
    ///
    /// For another payload type use `MachineBuilder::<S, P>::default()`.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: State, P> MachineBuilder<S, P> {
    /// Set the initial state (required).
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Declare an event and its updater.
    pub fn event<F, R>(mut self, name: impl Into<String>, updater: F) -> Self
    where
        P: 'static,
        F: Fn(&mut S, Option<&P>) -> R + 'static,
        R: Into<Update<S>> + 'static,
    {
        self.events.insert(name, updater);
        self
    }

    /// Declare which events may follow `event`. An empty list allows any.
    pub fn transition<I, N>(mut self, event: impl Into<String>, successors: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.transitions.insert(event, successors);
        self
    }

    /// Add every entry of a table, replacing entries with the same key.
    pub fn transitions(mut self, table: TransitionTable) -> Self {
        for (event, successors) in table.iter() {
            self.transitions.insert(event, successors.iter().cloned());
        }
        self
    }

    /// Validate the initial state with `schema` when building.
    pub fn schema(mut self, schema: impl Schema + 'static) -> Self {
        self.schema = Some(Box::new(schema));
        self
    }

    /// Check the transition table against the declared events, collecting
    /// every unknown reference instead of stopping at the first.
    ///
    /// Keys are reported before successors, each in declaration order.
    pub fn audit(&self) -> Validation<(), NonEmptyVec<BuildError>> {
        let keys = self
            .transitions
            .iter()
            .map(|(event, _)| self.check_reference(event, Reference::Key));

        let successors = self.transitions.iter().flat_map(move |(event, successors)| {
            successors.iter().map(move |successor| {
                self.check_reference(
                    successor,
                    Reference::Successor {
                        of: event.to_string(),
                    },
                )
            })
        });

        let checks: Vec<_> = keys.chain(successors).collect();
        Validation::all_vec(checks).map(|_| ())
    }

    fn check_reference(
        &self,
        event: &str,
        reference: Reference,
    ) -> Validation<(), NonEmptyVec<BuildError>> {
        if self.events.contains(event) {
            Validation::success(())
        } else {
            Validation::fail(BuildError::UnknownEventReference {
                event: event.to_string(),
                reference,
                valid: self.events.names().to_vec(),
            })
        }
    }

    /// Build the machine.
    /// Returns the first validation failure, if any.
    pub fn build(mut self) -> Result<Machine<S, P>, BuildError> {
        let initial = self.initial.take().ok_or(BuildError::MissingInitialState)?;

        if let Some(schema) = &self.schema {
            check_initial_state(&**schema, &initial)?;
        }

        if let Validation::Failure(errors) = self.audit() {
            if let Some(first) = errors.iter().next() {
                return Err(first.clone());
            }
        }

        let transitions = self.transitions.normalized(self.events.names());
        let machine = Machine::new(initial, self.events, transitions);
        debug!(
            machine = %machine.id(),
            events = machine.event_names().len(),
            "machine built"
        );
        Ok(machine)
    }
}

fn check_initial_state<S: State>(schema: &dyn Schema, initial: &S) -> Result<(), BuildError> {
    let value =
        serde_json::to_value(initial).map_err(|err| BuildError::InitialStateValidation {
            message: err.to_string(),
        })?;

    schema
        .safe_parse(&value)
        .map(|_| ())
        .map_err(|issue| BuildError::InitialStateValidation {
            message: issue.message,
        })
}

impl<S: State, P> Default for MachineBuilder<S, P> {
    fn default() -> Self {
        Self {
            initial: None,
            events: EventSet::new(),
            transitions: TransitionTable::new(),
            schema: None,
        }
    }
}

impl<S: State, P> fmt::Debug for MachineBuilder<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MachineBuilder")
            .field("initial", &self.initial)
            .field("events", &self.events)
            .field("transitions", &self.transitions)
            .field("schema", &self.schema.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::schema::SchemaIssue;
    use serde::{Deserialize, Serialize};
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    struct Door {
        open: bool,
        locked: bool,
    }

    fn door() -> Door {
        Door {
            open: false,
            locked: false,
        }
    }

    fn door_builder() -> MachineBuilder<Door> {
        MachineBuilder::new()
            .initial(door())
            .event("open", |_: &mut Door, _| json!({ "open": true }))
            .event("close", |_: &mut Door, _| json!({ "open": false }))
            .event("lock", |draft: &mut Door, _| draft.locked = true)
    }

    #[test]
    fn builder_requires_initial_state() {
        let result = MachineBuilder::<Door>::new()
            .event("open", |_: &mut Door, _| ())
            .build();

        assert!(matches!(result, Err(BuildError::MissingInitialState)));
    }

    #[test]
    fn unknown_transition_key_is_rejected() {
        let result = door_builder().transition("slam", ["open"]).build();

        assert_eq!(
            result.unwrap_err(),
            BuildError::UnknownEventReference {
                event: "slam".to_string(),
                reference: Reference::Key,
                valid: vec!["open".to_string(), "close".to_string(), "lock".to_string()],
            }
        );
    }

    #[test]
    fn unknown_successor_is_rejected() {
        let result = door_builder().transition("close", ["lock", "knock"]).build();

        match result {
            Err(BuildError::UnknownEventReference {
                event, reference, ..
            }) => {
                assert_eq!(event, "knock");
                assert_eq!(
                    reference,
                    Reference::Successor {
                        of: "close".to_string()
                    }
                );
            }
            other => panic!("Expected unknown successor, got {other:?}"),
        }
    }

    #[test]
    fn keys_are_reported_before_successors() {
        let result = door_builder()
            .transition("open", ["knock"])
            .transition("slam", Vec::<String>::new())
            .build();

        assert!(matches!(
            result,
            Err(BuildError::UnknownEventReference { ref event, reference: Reference::Key, .. })
                if event == "slam"
        ));
    }

    #[test]
    fn audit_collects_every_unknown_reference() {
        let builder = door_builder()
            .transition("open", ["knock", "close"])
            .transition("slam", ["lock", "kick"]);

        match builder.audit() {
            Validation::Failure(errors) => {
                let events: Vec<_> = errors
                    .iter()
                    .map(|e| match e {
                        BuildError::UnknownEventReference { event, .. } => event.as_str(),
                        _ => "",
                    })
                    .collect();
                assert_eq!(events, ["slam", "knock", "kick"]);
            }
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }

    #[test]
    fn audit_succeeds_for_consistent_table() {
        let builder = door_builder()
            .transition("open", ["close"])
            .transition("close", ["open", "lock"]);

        assert!(builder.audit().is_success());
    }

    #[test]
    fn schema_runs_before_table_checks() {
        let result = door_builder()
            .transition("slam", ["open"])
            .schema(|_: &Value| -> Result<Value, SchemaIssue> {
                Err(SchemaIssue::new("door must be a wall"))
            })
            .build();

        assert_eq!(
            result.unwrap_err(),
            BuildError::InitialStateValidation {
                message: "door must be a wall".to_string()
            }
        );
    }

    #[test]
    fn schema_sees_initial_state_as_json() {
        let seen = Rc::new(Cell::new(false));
        let flag = Rc::clone(&seen);
        let machine = door_builder()
            .schema(move |value: &Value| -> Result<Value, SchemaIssue> {
                flag.set(value == &json!({ "open": false, "locked": false }));
                Ok(value.clone())
            })
            .build();

        assert!(machine.is_ok());
        assert!(seen.get());
    }

    #[test]
    fn missing_entries_are_normalized_to_empty() {
        let machine = door_builder().transition("open", ["close"]).build().unwrap();
        let table = machine.transitions();

        assert_eq!(table.len(), 3);
        assert_eq!(table.get("close"), Some(&[][..]));
        assert_eq!(table.get("lock"), Some(&[][..]));
    }

    #[test]
    fn transitions_merges_a_table() {
        let table = TransitionTable::new()
            .with("open", ["close"])
            .with("close", ["open"]);
        let machine = door_builder()
            .transition("open", ["lock"])
            .transitions(table)
            .build()
            .unwrap();

        machine.dispatch("open").unwrap();
        assert_eq!(machine.valid_next_events(), ["close"]);
    }

    #[test]
    fn custom_payload_type() {
        let machine = MachineBuilder::<Door, bool>::default()
            .initial(door())
            .event("set_lock", |draft: &mut Door, locked: Option<&bool>| {
                draft.locked = locked.copied().unwrap_or(false);
            })
            .build()
            .unwrap();

        machine.dispatch_with("set_lock", true).unwrap();
        assert!(machine.state().locked);
    }
}
