//! Ordered placeholder maps.
//!
//! Resolution reserves keys before their values exist so declaration order
//! survives passes that resolve entries out of order. A map is complete once
//! [`SlotMap::pending_keys`] is empty.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A reserved map entry
#[derive(Debug, Clone, PartialEq)]
pub enum Slot<T> {
    Pending,
    Resolved(T),
}

impl<T> Slot<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Slot::Pending)
    }

    pub fn as_resolved(&self) -> Option<&T> {
        match self {
            Slot::Resolved(value) => Some(value),
            Slot::Pending => None,
        }
    }

    pub fn as_resolved_mut(&mut self) -> Option<&mut T> {
        match self {
            Slot::Resolved(value) => Some(value),
            Slot::Pending => None,
        }
    }
}

impl<T: Serialize> Serialize for Slot<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Slot::Pending => serializer.serialize_none(),
            Slot::Resolved(value) => serializer.serialize_some(value),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Slot<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Slot::Resolved(value),
            None => Slot::Pending,
        })
    }
}

/// Insertion-ordered map of named slots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotMap<T> {
    entries: IndexMap<String, Slot<T>>,
}

impl<T> Default for SlotMap<T> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<T> SlotMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `key` at the end of the map. Existing entries keep their value and position.
    pub fn reserve(&mut self, key: impl Into<String>) {
        self.entries.entry(key.into()).or_insert(Slot::Pending);
    }

    /// Fill a slot, appending it when it was never reserved
    pub fn resolve(&mut self, key: impl Into<String>, value: T) {
        self.entries.insert(key.into(), Slot::Resolved(value));
    }

    /// Remove an entry keeping the order of the rest
    pub fn remove(&mut self, key: &str) -> Option<Slot<T>> {
        self.entries.shift_remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key).and_then(Slot::as_resolved)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut T> {
        self.entries.get_mut(key).and_then(Slot::as_resolved_mut)
    }

    /// Whether `key` is present, pending or not
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.entries.get(key).is_some_and(Slot::is_pending)
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.entries.get_index_of(key)
    }

    pub fn pending_keys(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, slot)| slot.is_pending())
            .map(|(key, _)| key.as_str())
            .collect()
    }

    /// All keys in order, pending ones included
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Resolved entries in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries
            .iter()
            .filter_map(|(key, slot)| slot.as_resolved().map(|value| (key.as_str(), value)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut T)> {
        self.entries
            .iter_mut()
            .filter_map(|(key, slot)| slot.as_resolved_mut().map(|value| (key.as_str(), value)))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.values().filter_map(Slot::as_resolved)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
