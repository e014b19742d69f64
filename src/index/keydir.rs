//! Key directory map
//!
//! A plain map from key to its current entry, values materialized in
//! memory. Mutated only by the store under its state lock.

use std::collections::HashMap;

use crate::log::Entry;

/// Map from key to its latest entry.
///
/// All operations are O(1) expected time. Mutation rules: a put inserts or
/// overwrites (latest wins), a delete removes, and nothing else touches it.
#[derive(Debug, Default)]
pub struct KeyDir {
    entries: HashMap<String, Entry>,
}

impl KeyDir {
    /// Creates an empty key directory
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Returns the entry for a key, if present
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    /// Inserts or overwrites the entry for a key
    pub fn insert(&mut self, key: String, entry: Entry) {
        self.entries.insert(key, entry);
    }

    /// Removes a key; no-op if absent
    pub fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }

    /// Returns whether a key is present
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterates over all (key, entry) pairs in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Entry)> {
        self.entries.iter()
    }

    /// Returns all keys in sorted order.
    ///
    /// Sorting keeps listings and compaction output deterministic for a
    /// given directory state.
    pub fn sorted_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Returns the number of keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the directory is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
