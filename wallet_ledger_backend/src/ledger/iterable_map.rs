//! Enumerable map with soft deletion.
//!
//! Every key ever inserted gets a permanent slot in an append-only tombstone
//! list. Lookups go through a `BTreeMap` index; enumeration walks the slots in
//! order and skips tombstoned ones, so iteration always follows first-insertion
//! order of the live keys.
//!
//! Removing a key marks its slot deleted and drops it from the index. The slot
//! is never compacted or handed to another key. Inserting the same key again
//! later appends a fresh slot at the end.

use candid::{CandidType, Deserialize};
use std::collections::BTreeMap;

/// Result of [`TombstonedOrderedMap::insert`].
#[derive(CandidType, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A new slot was appended and holds the default value.
    Created,
    /// The key was already live; nothing changed.
    AlreadyPresent,
}

#[derive(CandidType, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Tombstone<K> {
    pub key: K,
    pub deleted: bool,
}

#[derive(CandidType, Deserialize, Clone, Debug, PartialEq, Eq)]
struct IndexedValue<V> {
    slot: u64,
    value: V,
}

#[derive(CandidType, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(bound(deserialize = "K: Deserialize<'de> + Ord, V: Deserialize<'de>"))]
pub struct TombstonedOrderedMap<K: Ord, V> {
    slots: Vec<Tombstone<K>>,
    index: BTreeMap<K, IndexedValue<V>>,
    size: u64,
}

impl<K: Ord + Clone, V: Default> TombstonedOrderedMap<K, V> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            index: BTreeMap::new(),
            size: 0,
        }
    }

    /// Inserts `key` with `V::default()` unless it is already live.
    pub fn insert(&mut self, key: K) -> InsertOutcome {
        if self.index.contains_key(&key) {
            return InsertOutcome::AlreadyPresent;
        }

        let slot = self.slots.len() as u64;
        self.slots.push(Tombstone { key: key.clone(), deleted: false });
        self.index.insert(key, IndexedValue { slot, value: V::default() });
        self.size += 1;
        InsertOutcome::Created
    }

    /// Tombstones `key`. Returns false if the key was not live.
    pub fn remove(&mut self, key: &K) -> bool {
        let Some(entry) = self.index.remove(key) else {
            return false;
        };
        self.slots[entry.slot as usize].deleted = true;
        self.size -= 1;
        true
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.index.get(key).map(|e| &e.value)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.index.get_mut(key).map(|e| &mut e.value)
    }

    /// Permanent slot of a live key.
    pub fn slot_of(&self, key: &K) -> Option<usize> {
        self.index.get(key).map(|e| e.slot as usize)
    }

    /// Number of slots ever allocated, live or tombstoned.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.size as usize
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Live entries in insertion order. Each call starts from the first slot.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: self.slots.iter(),
            index: &self.index,
        }
    }
}

impl<K: Ord + Clone, V: Default> Default for TombstonedOrderedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Iter<'a, K: Ord, V> {
    slots: std::slice::Iter<'a, Tombstone<K>>,
    index: &'a BTreeMap<K, IndexedValue<V>>,
}

impl<'a, K: Ord, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        for tombstone in self.slots.by_ref() {
            if tombstone.deleted {
                continue;
            }
            if let Some((key, entry)) = self.index.get_key_value(&tombstone.key) {
                return Some((key, &entry.value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.slots.len()))
    }
}

impl<'a, K: Ord + Clone, V: Default> IntoIterator for &'a TombstonedOrderedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
