// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory record store.
//!
//! [`MemoryStore`] keeps every record in a `BTreeMap` for the lifetime of the
//! process. It backs ephemeral CLI runs and tests; nothing is persisted.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::{RecordStore, StoreError};

/// In-memory record store.
///
/// Keys iterate in sorted order so [`keys`](MemoryStore::keys) is
/// deterministic across runs.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> MutexGuard<'_, BTreeMap<String, Vec<u8>>> {
        // A poisoned lock still holds a consistent map: writes are single inserts.
        self.records.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records().len()
    }

    /// Returns `true` if no records are stored.
    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }

    /// All keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.records().keys().cloned().collect()
    }
}

impl RecordStore for MemoryStore {
    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.records().contains_key(key))
    }

    fn load_raw(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.records()
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_owned()))
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), StoreError> {
        self.records().insert(key.to_owned(), data.to_vec());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load() {
        let store = MemoryStore::new();
        store.save_raw("K1", b"payload").unwrap();
        assert_eq!(store.load_raw("K1").unwrap(), b"payload");
        assert!(store.contains("K1").unwrap());
    }

    #[test]
    fn missing_key_is_not_found() {
        let store = MemoryStore::new();
        assert!(!store.contains("absent").unwrap());
        assert!(matches!(
            store.load_raw("absent"),
            Err(StoreError::NotFound(key)) if key == "absent"
        ));
    }

    #[test]
    fn save_replaces_whole_value() {
        let store = MemoryStore::new();
        store.save_raw("K", b"first-and-longer").unwrap();
        store.save_raw("K", b"second").unwrap();
        assert_eq!(store.load_raw("K").unwrap(), b"second");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn keys_are_sorted() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        for key in ["b", "c", "a"] {
            store.save_raw(key, b"x").unwrap();
        }
        assert_eq!(store.keys(), vec!["a", "b", "c"]);
    }

    #[test]
    fn borrowed_store_is_a_store() {
        fn write_through<S: RecordStore>(store: S) {
            store.save_raw("K", b"v").unwrap();
        }
        let store = MemoryStore::new();
        write_through(&store);
        assert!(store.contains("K").unwrap());
    }
}
