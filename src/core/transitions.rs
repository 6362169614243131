//! The transition table: which events may follow which.
//!
//! An entry maps an event to its permitted successors. An empty successor
//! list means "any event may follow". An event with no entry at all is
//! treated the same way, so "missing" and "empty" are one semantic.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Ordered mapping from event name to the events allowed to follow it.
///
/// Entries and successor lists keep the order they were declared in.
/// Serializes as a JSON object, so tables can be kept in configuration:
///
/// ```rust
/// use statewise::core::TransitionTable;
///
/// let table: TransitionTable =
///     serde_json::from_str(r#"{ "green": ["yellow"], "yellow": ["red"], "red": ["green"] }"#)
///         .unwrap();
///
/// assert!(table.permits("green", "yellow"));
/// assert!(!table.permits("green", "red"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransitionTable {
    entries: Vec<(String, Vec<String>)>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the successors of `event`, replacing any previous entry.
    pub fn insert<I, N>(&mut self, event: impl Into<String>, successors: I)
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let event = event.into();
        let successors: Vec<String> = successors.into_iter().map(Into::into).collect();
        match self.entries.iter_mut().find(|(name, _)| *name == event) {
            Some((_, existing)) => *existing = successors,
            None => self.entries.push((event, successors)),
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with<I, N>(mut self, event: impl Into<String>, successors: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.insert(event, successors);
        self
    }

    /// Declared successors of `event`, or `None` when it has no entry.
    pub fn get(&self, event: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(name, _)| name == event)
            .map(|(_, successors)| successors.as_slice())
    }

    /// Successors of `event`, with a missing entry read as empty.
    pub fn successors(&self, event: &str) -> &[String] {
        self.get(event).unwrap_or(&[])
    }

    /// Whether `next` may follow `current` (pure).
    pub fn permits(&self, current: &str, next: &str) -> bool {
        let successors = self.successors(current);
        successors.is_empty() || successors.iter().any(|s| s == next)
    }

    /// Iterate entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, successors)| (name.as_str(), successors.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A table with one entry per name in `events`, in that order.
    ///
    /// Names without an entry get an explicit empty successor list; entries
    /// for names outside `events` are dropped.
    pub fn normalized(&self, events: &[String]) -> Self {
        let entries = events
            .iter()
            .map(|name| (name.clone(), self.successors(name).to_vec()))
            .collect();
        Self { entries }
    }
}

impl Serialize for TransitionTable {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, successors) in &self.entries {
            map.serialize_entry(name, successors)?;
        }
        map.end()
    }
}

struct TableVisitor;

impl<'de> Visitor<'de> for TableVisitor {
    type Value = TransitionTable;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of event names to lists of event names")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut table = TransitionTable::new();
        while let Some((name, successors)) = access.next_entry::<String, Vec<String>>()? {
            table.insert(name, successors);
        }
        Ok(table)
    }
}

impl<'de> Deserialize<'de> for TransitionTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(TableVisitor)
    }
}

impl<E, I, N> FromIterator<(E, I)> for TransitionTable
where
    E: Into<String>,
    I: IntoIterator<Item = N>,
    N: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (E, I)>>(iter: T) -> Self {
        let mut table = TransitionTable::new();
        for (event, successors) in iter {
            table.insert(event, successors);
        }
        table
    }
}
