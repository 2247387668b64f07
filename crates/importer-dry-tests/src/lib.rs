// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles and fixtures for importer ledger crates.
#![forbid(unsafe_code)]
//!
//! # Modules
//!
//! - [`store`] - In-memory record store fake with failure injection
//! - [`clock`] - Deterministic clocks
//! - [`fixtures`] - Violation/profile builders and sample ids

pub mod clock;
pub mod fixtures;
pub mod store;

use importer_core::Registry;

pub use clock::{ManualClock, TickingClock, DEFAULT_EPOCH_SECS};
pub use fixtures::{
    violation_history_json, violations, ProfileBuilder, ViolationBuilder, FIXTURE_INSTANT,
    SAMPLE_IMPORTER,
};
pub use store::InMemoryRecordStore;

/// Registry over a fresh fake store and ticking clock, plus a handle to the
/// store for inspection.
pub fn test_registry() -> (Registry<InMemoryRecordStore, TickingClock>, InMemoryRecordStore) {
    let store = InMemoryRecordStore::new();
    let registry = Registry::with_clock(store.clone(), TickingClock::new());
    (registry, store)
}
