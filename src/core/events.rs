//! The declared event set: event names bound to updaters, in declaration order.

use super::update::Update;
use std::collections::HashMap;
use std::fmt;

/// Type alias for boxed updater functions.
///
/// An updater edits the draft it is given and/or returns an [`Update`]
/// telling the engine how to finish it.
pub type Updater<S, P> = Box<dyn Fn(&mut S, Option<&P>) -> Update<S>>;

/// Ordered mapping from event name to updater.
///
/// Names are unique. Declaring a name a second time replaces its updater
/// and keeps the original position.
pub struct EventSet<S, P> {
    names: Vec<String>,
    updaters: Vec<Updater<S, P>>,
    index: HashMap<String, usize>,
}

impl<S, P> EventSet<S, P> {
    pub fn new() -> Self {
        Self {
            names: Vec::new(),
            updaters: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Declare an event, or replace the updater of an existing one.
    pub fn insert<F, R>(&mut self, name: impl Into<String>, updater: F)
    where
        S: 'static,
        P: 'static,
        F: Fn(&mut S, Option<&P>) -> R + 'static,
        R: Into<Update<S>> + 'static,
    {
        let boxed: Updater<S, P> =
            Box::new(move |draft: &mut S, payload: Option<&P>| -> Update<S> {
                updater(draft, payload).into()
            });
        let name = name.into();
        match self.index.get(&name) {
            Some(&slot) => self.updaters[slot] = boxed,
            None => {
                self.index.insert(name.clone(), self.names.len());
                self.names.push(name);
                self.updaters.push(boxed);
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Updater<S, P>> {
        self.index.get(name).map(|&slot| &self.updaters[slot])
    }

    /// Event names in declaration order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S, P> Default for EventSet<S, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, P> fmt::Debug for EventSet<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSet").field("names", &self.names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[derive(Clone, Debug, PartialEq)]
    struct Light {
        on: bool,
    }

    #[test]
    fn names_keep_declaration_order() {
        let mut events: EventSet<Light, Value> = EventSet::new();
        events.insert("zeta", |_, _| ());
        events.insert("alpha", |_, _| ());
        events.insert("mid", |_, _| ());

        assert_eq!(events.names(), ["zeta", "alpha", "mid"]);
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn redeclaring_replaces_updater_in_place() {
        let mut events: EventSet<Light, Value> = EventSet::new();
        events.insert("toggle", |_, _| ());
        events.insert("off", |_, _| ());
        events.insert("toggle", |draft: &mut Light, _| draft.on = !draft.on);

        assert_eq!(events.names(), ["toggle", "off"]);

        let mut draft = Light { on: false };
        let update = (events.get("toggle").unwrap())(&mut draft, None);
        assert!(matches!(update, Update::Draft));
        assert!(draft.on);
    }

    #[test]
    fn lookup_of_unknown_event() {
        let mut events: EventSet<Light, Value> = EventSet::new();
        events.insert("on", |_, _| json!({ "on": true }));

        assert!(events.contains("on"));
        assert!(!events.contains("off"));
        assert!(events.get("off").is_none());
    }
}
