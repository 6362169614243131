//! State machine that applies named events to state.

use crate::core::{EventSet, State, TransitionTable};
use crate::engine::error::DispatchError;
use crate::engine::listeners::{Listener, ListenerSet, Subscription};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, trace};
use uuid::Uuid;

/// Identifier attached to every log record a machine emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MachineId(Uuid);

impl MachineId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Which part of a dispatch is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Updating,
    Notifying,
}

#[derive(Clone, Debug)]
struct Active {
    event: String,
    phase: Phase,
}

/// Marks a dispatch as running; cleared on drop, including during unwinding.
struct InFlight<'a>(&'a RefCell<Option<Active>>);

impl<'a> InFlight<'a> {
    fn enter(slot: &'a RefCell<Option<Active>>, event: &str) -> Self {
        *slot.borrow_mut() = Some(Active {
            event: event.to_string(),
            phase: Phase::Updating,
        });
        Self(slot)
    }

    fn notifying(&self) {
        if let Some(active) = self.0.borrow_mut().as_mut() {
            active.phase = Phase::Notifying;
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.0.borrow_mut() = None;
    }
}

/// An event-driven state container.
///
/// Events are applied with [`dispatch`](Self::dispatch). Each successful
/// dispatch produces exactly one new immutable snapshot, records the event
/// as current and notifies every listener with the snapshot.
///
/// Machines are created by [`MachineBuilder`](crate::builder::MachineBuilder),
/// which validates the transition table first. All methods take `&self`, so
/// a machine can be shared through `Rc` with code whose listeners call back
/// into it. A dispatch started while another one on the same machine is
/// still running is rejected with [`DispatchError::Reentrant`].
///
/// A machine belongs to a single thread.
pub struct Machine<S: State, P = Value> {
    id: MachineId,
    initial: Rc<S>,
    state: RefCell<Rc<S>>,
    current: RefCell<Option<String>>,
    events: EventSet<S, P>,
    transitions: TransitionTable,
    listeners: ListenerSet<S>,
    in_flight: RefCell<Option<Active>>,
}

impl<S: State, P> Machine<S, P> {
    /// Create a machine with no current event. `transitions` must already
    /// be checked against `events`.
    pub(crate) fn new(initial: S, events: EventSet<S, P>, transitions: TransitionTable) -> Self {
        let initial = Rc::new(initial);
        Self {
            id: MachineId::generate(),
            state: RefCell::new(Rc::clone(&initial)),
            initial,
            current: RefCell::new(None),
            events,
            transitions,
            listeners: ListenerSet::new(),
            in_flight: RefCell::new(None),
        }
    }

    pub fn id(&self) -> MachineId {
        self.id
    }

    /// Dispatch an event without a payload.
    pub fn dispatch(&self, event: &str) -> Result<(), DispatchError> {
        self.apply(event, None)
    }

    /// Dispatch an event, handing `payload` to its updater.
    pub fn dispatch_with(&self, event: &str, payload: P) -> Result<(), DispatchError> {
        self.apply(event, Some(&payload))
    }

    fn apply(&self, event: &str, payload: Option<&P>) -> Result<(), DispatchError> {
        let active = self.in_flight.borrow().as_ref().map(|a| a.event.clone());
        if let Some(active) = active {
            debug!(machine = %self.id, event, active = %active, "reentrant dispatch rejected");
            return Err(DispatchError::Reentrant {
                event: event.to_string(),
                active,
            });
        }

        let Some(updater) = self.events.get(event) else {
            debug!(machine = %self.id, event, "unknown event rejected");
            return Err(DispatchError::UnknownEvent {
                event: event.to_string(),
                known: self.events.names().to_vec(),
            });
        };
        self.check_transition(event)?;

        let in_flight = InFlight::enter(&self.in_flight, event);

        // Updaters only ever see a private draft.
        let mut draft = S::clone(&self.state.borrow());
        let update = updater(&mut draft, payload);
        let next = update
            .finish(draft)
            .map_err(|source| DispatchError::MergeFailed {
                event: event.to_string(),
                source,
            })?;

        let snapshot = Rc::new(next);
        *self.state.borrow_mut() = Rc::clone(&snapshot);
        let previous = self.current.replace(Some(event.to_string()));
        debug!(machine = %self.id, event, previous = ?previous, "event dispatched");

        in_flight.notifying();
        let listeners = self.listeners.current();
        trace!(machine = %self.id, event, listeners = listeners.len(), "notifying listeners");
        for listener in listeners {
            listener(&snapshot);
        }

        Ok(())
    }

    fn check_transition(&self, event: &str) -> Result<(), DispatchError> {
        let current = self.current.borrow();
        let Some(current) = current.as_deref() else {
            return Ok(());
        };

        if self.transitions.permits(current, event) {
            return Ok(());
        }

        debug!(machine = %self.id, event, current, "invalid transition rejected");
        Err(DispatchError::InvalidTransition {
            event: event.to_string(),
            current: current.to_string(),
            allowed: self.transitions.successors(current).to_vec(),
        })
    }

    /// Whether `dispatch(event)` would pass the event and transition checks
    /// from the current event (pure; the updater is not run).
    pub fn can_dispatch(&self, event: &str) -> bool {
        if !self.events.contains(event) {
            return false;
        }
        match self.current.borrow().as_deref() {
            Some(current) => self.transitions.permits(current, event),
            None => true,
        }
    }

    /// Register a listener called with the new state after every
    /// successful dispatch.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&S) + 'static,
    {
        self.subscribe_listener(Rc::new(listener))
    }

    /// Register a shared listener. Registering the same `Rc` again keeps
    /// a single membership.
    pub fn subscribe_listener(&self, listener: Listener<S>) -> Subscription {
        self.listeners.add(listener)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Current state snapshot.
    ///
    /// Snapshots are immutable and never change once handed out; a new
    /// one replaces it on every dispatch. Use `Rc::make_mut` or clone to
    /// obtain an owned copy to edit.
    pub fn state(&self) -> Rc<S> {
        Rc::clone(&self.state.borrow())
    }

    /// The most recently dispatched event, or `None` before the first
    /// dispatch and after a reset.
    pub fn current_event(&self) -> Option<String> {
        self.current.borrow().clone()
    }

    /// Events that may be dispatched next.
    ///
    /// With no current event this is every declared event. Otherwise it is
    /// the current event's successor list, where an empty list means any
    /// event may follow.
    pub fn valid_next_events(&self) -> Vec<String> {
        match self.current.borrow().as_deref() {
            Some(current) => self.transitions.successors(current).to_vec(),
            None => self.events.names().to_vec(),
        }
    }

    /// Restore the construction-time state and clear the current event.
    ///
    /// Listeners are kept and are not notified. Allowed from a listener;
    /// rejected from an updater, whose draft would otherwise overwrite
    /// the reset when the dispatch commits.
    pub fn reset_state(&self) -> Result<(), DispatchError> {
        if let Some(active) = self.in_flight.borrow().as_ref() {
            if active.phase == Phase::Updating {
                debug!(machine = %self.id, active = %active.event, "reset during update rejected");
                return Err(DispatchError::ResetDuringUpdate {
                    active: active.event.clone(),
                });
            }
        }

        *self.state.borrow_mut() = Rc::clone(&self.initial);
        let previous = self.current.take();
        debug!(machine = %self.id, previous = ?previous, "state reset");
        Ok(())
    }

    /// Declared event names in declaration order.
    pub fn event_names(&self) -> &[String] {
        self.events.names()
    }

    /// The transition table, with an entry for every declared event.
    pub fn transitions(&self) -> &TransitionTable {
        &self.transitions
    }
}

impl<S: State, P> fmt::Debug for Machine<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("id", &self.id)
            .field("state", &self.state.borrow())
            .field("current", &self.current.borrow())
            .field("events", &self.events)
            .field("transitions", &self.transitions)
            .finish()
    }
}
