// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Record store port for the importer ledger.
//!
//! `importer-store` defines the minimal key-value contract the ledger consumes
//! ([`RecordStore`]) and a typed adapter on top of it ([`ProfileStore`]) that
//! owns serialization and existence checks. [`MemoryStore`] is the in-process
//! tier; the filesystem tier lives in `importer-store-fs`. A replicated ledger
//! backend only needs to implement the three [`RecordStore`] methods.
//!
//! # Write Semantics
//!
//! `save_raw` replaces the entire value at a key. There are no partial-field
//! writes at this layer: callers always write a complete record. A failed save
//! must leave the previous value readable.
//!
//! # Ordering
//!
//! The port assumes an outer sequencing layer serializes writes per key. It
//! offers read-your-writes within one caller and nothing more.
#![forbid(unsafe_code)]

mod memory;
mod profile;

pub use memory::MemoryStore;
pub use profile::{ProfileStore, ProfileStoreError};

use thiserror::Error;

/// Errors raised by a record store substrate.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Nothing stored at the key.
    #[error("[STORE_NOT_FOUND] no record at key {0:?}")]
    NotFound(String),
    /// Key cannot be used by this substrate.
    #[error("[STORE_INVALID_KEY] key {0:?} is not addressable")]
    InvalidKey(String),
    /// I/O failure while reading or writing.
    #[error("[STORE_IO] {0}")]
    Io(#[from] std::io::Error),
    /// Substrate-specific failure.
    #[error("[STORE_FAILURE] {0}")]
    Other(String),
}

/// Raw key-value substrate keyed by importer id.
///
/// Methods take `&self`; implementations that mutate use interior mutability,
/// matching how ledger stubs are shared with the code that drives them.
pub trait RecordStore {
    /// Returns `true` when a value is present at `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the substrate cannot be read.
    fn contains(&self, key: &str) -> Result<bool, StoreError>;

    /// Load the bytes stored at `key`. Returns [`StoreError::NotFound`] when
    /// missing.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] on absence, any other variant on read failure.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Replace the value at `key` with `data`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the write fails; the previous value must
    /// remain intact in that case.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), StoreError>;
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        (**self).contains(key)
    }

    fn load_raw(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        (**self).load_raw(key)
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), StoreError> {
        (**self).save_raw(key, data)
    }
}

impl<S: RecordStore + ?Sized> RecordStore for Box<S> {
    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        (**self).contains(key)
    }

    fn load_raw(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        (**self).load_raw(key)
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), StoreError> {
        (**self).save_raw(key, data)
    }
}
