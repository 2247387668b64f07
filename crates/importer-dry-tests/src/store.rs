// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory record store fake with call counting and failure injection.

use importer_store::{RecordStore, StoreError};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// In-memory implementation of [`RecordStore`] for testing.
///
/// Clones share state, so a test can hand one clone to a
/// [`Registry`](importer_core::Registry) and inspect the other.
///
/// # Example
///
/// ```
/// use importer_dry_tests::InMemoryRecordStore;
/// use importer_store::RecordStore;
///
/// let store = InMemoryRecordStore::new();
/// let handle = store.clone();
///
/// store.save_raw("27AABCU9603R1ZN", b"{}").unwrap();
/// assert_eq!(handle.save_count(), 1);
/// assert!(handle.contains_key("27AABCU9603R1ZN"));
/// ```
#[derive(Clone, Default)]
pub struct InMemoryRecordStore {
    inner: Arc<Mutex<InMemoryRecordStoreInner>>,
}

#[derive(Default)]
struct InMemoryRecordStoreInner {
    data: BTreeMap<String, Vec<u8>>,
    contains_count: usize,
    load_count: usize,
    save_count: usize,
    fail_on_contains: bool,
    fail_on_load: bool,
    fail_on_save: bool,
}

impl InMemoryRecordStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with raw records.
    pub fn with_data(data: BTreeMap<String, Vec<u8>>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(InMemoryRecordStoreInner {
                data,
                ..Default::default()
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, InMemoryRecordStoreInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make existence checks fail.
    pub fn set_fail_on_contains(&self, fail: bool) {
        self.lock().fail_on_contains = fail;
    }

    /// Make loads fail.
    pub fn set_fail_on_load(&self, fail: bool) {
        self.lock().fail_on_load = fail;
    }

    /// Make saves fail. A failed save stores nothing.
    pub fn set_fail_on_save(&self, fail: bool) {
        self.lock().fail_on_save = fail;
    }

    /// Number of `contains` calls, including failed ones.
    pub fn contains_count(&self) -> usize {
        self.lock().contains_count
    }

    /// Number of `load_raw` calls, including failed ones.
    pub fn load_count(&self) -> usize {
        self.lock().load_count
    }

    /// Number of `save_raw` calls, including failed ones.
    pub fn save_count(&self) -> usize {
        self.lock().save_count
    }

    /// Check presence without counting a call.
    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().data.contains_key(key)
    }

    /// Raw bytes at `key`, without counting a call.
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.lock().data.get(key).cloned()
    }

    /// Overwrite raw bytes at `key`, bypassing counters and failure flags.
    /// Used to plant corrupt or legacy records.
    pub fn plant(&self, key: &str, bytes: &[u8]) {
        self.lock().data.insert(key.to_owned(), bytes.to_vec());
    }

    /// Copy of every stored record, for byte-for-byte comparisons.
    pub fn snapshot(&self) -> BTreeMap<String, Vec<u8>> {
        self.lock().data.clone()
    }

    /// All keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.lock().data.keys().cloned().collect()
    }

    /// Clear data, counters, and failure flags.
    pub fn reset(&self) {
        *self.lock() = InMemoryRecordStoreInner::default();
    }
}

impl RecordStore for InMemoryRecordStore {
    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        let mut inner = self.lock();
        inner.contains_count += 1;

        if inner.fail_on_contains {
            return Err(StoreError::Other("simulated contains failure".into()));
        }

        Ok(inner.data.contains_key(key))
    }

    fn load_raw(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let mut inner = self.lock();
        inner.load_count += 1;

        if inner.fail_on_load {
            return Err(StoreError::Other("simulated load failure".into()));
        }

        inner
            .data
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_owned()))
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.save_count += 1;

        if inner.fail_on_save {
            return Err(StoreError::Other("simulated save failure".into()));
        }

        inner.data.insert(key.to_owned(), data.to_vec());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_key_returns_not_found() {
        let store = InMemoryRecordStore::new();
        assert!(matches!(
            store.load_raw("missing"),
            Err(StoreError::NotFound(_))
        ));
        assert_eq!(store.load_count(), 1);
    }

    #[test]
    fn failed_save_stores_nothing_but_counts() {
        let store = InMemoryRecordStore::new();
        store.set_fail_on_save(true);
        assert!(store.save_raw("K", b"v").is_err());
        assert_eq!(store.save_count(), 1);
        assert!(!store.contains_key("K"));
    }

    #[test]
    fn fail_on_contains_surfaces_error() {
        let store = InMemoryRecordStore::new();
        store.set_fail_on_contains(true);
        assert!(matches!(store.contains("K"), Err(StoreError::Other(_))));
        assert_eq!(store.contains_count(), 1);
    }

    #[test]
    fn clones_share_state() {
        let a = InMemoryRecordStore::new();
        let b = a.clone();
        a.save_raw("K", b"v").unwrap();
        assert_eq!(b.raw("K").unwrap(), b"v");
        b.set_fail_on_load(true);
        assert!(a.load_raw("K").is_err());
    }

    #[test]
    fn plant_bypasses_flags_and_counters() {
        let store = InMemoryRecordStore::new();
        store.set_fail_on_save(true);
        store.plant("K", b"raw");
        assert_eq!(store.save_count(), 0);
        assert_eq!(store.snapshot().get("K").unwrap(), b"raw");
    }

    #[test]
    fn reset_clears_everything() {
        let mut initial = BTreeMap::new();
        initial.insert("K".to_string(), b"v".to_vec());
        let store = InMemoryRecordStore::with_data(initial);
        store.set_fail_on_load(true);
        let _ = store.load_raw("K");
        store.reset();
        assert!(store.keys().is_empty());
        assert_eq!(store.load_count(), 0);
        assert!(matches!(
            store.load_raw("K"),
            Err(StoreError::NotFound(_))
        ));
    }
}
