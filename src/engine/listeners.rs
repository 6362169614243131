//! Listener registry and subscription handles.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// A state-change listener. Called with the new snapshot after every
/// successful dispatch.
///
/// Membership is by `Rc` identity: registering the same `Rc` twice keeps a
/// single membership, so it is notified once per dispatch.
pub type Listener<S> = Rc<dyn Fn(&S)>;

struct Registry<S> {
    entries: Vec<(u64, Listener<S>)>,
    next_id: u64,
}

/// Removal side of the registry, independent of the state type.
trait Detach {
    fn detach(&self, id: u64);
    fn holds(&self, id: u64) -> bool;
}

impl<S> Detach for RefCell<Registry<S>> {
    fn detach(&self, id: u64) {
        self.borrow_mut().entries.retain(|(entry, _)| *entry != id);
    }

    fn holds(&self, id: u64) -> bool {
        self.borrow().entries.iter().any(|(entry, _)| *entry == id)
    }
}

/// Per-machine set of listeners, notified in subscription order.
pub(crate) struct ListenerSet<S> {
    registry: Rc<RefCell<Registry<S>>>,
}

impl<S: 'static> ListenerSet<S> {
    pub(crate) fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                entries: Vec::new(),
                next_id: 0,
            })),
        }
    }

    pub(crate) fn add(&self, listener: Listener<S>) -> Subscription {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let existing = registry
                .entries
                .iter()
                .find(|(_, entry)| Rc::ptr_eq(entry, &listener))
                .map(|(id, _)| *id);
            match existing {
                Some(id) => id,
                None => {
                    let id = registry.next_id;
                    registry.next_id += 1;
                    registry.entries.push((id, listener));
                    id
                }
            }
        };

        let registry: Rc<dyn Detach> = self.registry.clone();
        Subscription {
            id,
            registry: Rc::downgrade(&registry),
        }
    }

    /// Listeners registered right now. Changes made while notifying the
    /// returned list take effect from the next dispatch.
    pub(crate) fn current(&self) -> Vec<Listener<S>> {
        self.registry
            .borrow()
            .entries
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.registry.borrow().entries.len()
    }
}

/// Handle returned by `subscribe`; removes exactly that listener.
///
/// Dropping the handle does not unsubscribe.
pub struct Subscription {
    id: u64,
    registry: Weak<dyn Detach>,
}

impl Subscription {
    /// Remove the listener. Safe to call more than once, and after the
    /// machine itself is gone.
    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.detach(self.id);
        }
    }

    /// Whether the listener is still registered.
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.holds(self.id))
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
