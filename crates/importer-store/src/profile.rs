// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Typed profile adapter over a [`RecordStore`].

use importer_schema::Profile;
use thiserror::Error;
use tracing::debug;

use crate::{RecordStore, StoreError};

/// Errors from the typed profile adapter.
#[derive(Debug, Error)]
pub enum ProfileStoreError {
    /// No profile stored for the key.
    #[error("no profile stored for {key:?}")]
    NotFound {
        /// Requested importer id.
        key: String,
    },
    /// Stored bytes do not decode to a [`Profile`].
    #[error("stored profile for {key:?} does not match the schema: {source}")]
    Corrupt {
        /// Importer id whose record failed to decode.
        key: String,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
    /// Profile could not be encoded.
    #[error("profile for {key:?} could not be encoded: {source}")]
    Encode {
        /// Importer id being written.
        key: String,
        /// Encoder error.
        #[source]
        source: serde_json::Error,
    },
    /// Underlying substrate failure.
    #[error(transparent)]
    Store(StoreError),
}

/// Serializes profiles as JSON and delegates bytes to a [`RecordStore`].
pub struct ProfileStore<S> {
    store: S,
}

impl<S> ProfileStore<S> {
    /// Wrap a raw store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the raw store.
    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Consume the adapter and return the raw store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S> ProfileStore<S>
where
    S: RecordStore,
{
    /// Returns `true` iff a value is present at `key`.
    ///
    /// # Errors
    ///
    /// [`ProfileStoreError::Store`] when the substrate read fails.
    pub fn exists(&self, key: &str) -> Result<bool, ProfileStoreError> {
        self.store.contains(key).map_err(ProfileStoreError::Store)
    }

    /// Load and decode the profile at `key`.
    ///
    /// # Errors
    ///
    /// [`ProfileStoreError::NotFound`] when absent, [`ProfileStoreError::Corrupt`]
    /// when the bytes do not decode, [`ProfileStoreError::Store`] on read failure.
    pub fn get(&self, key: &str) -> Result<Profile, ProfileStoreError> {
        let bytes = match self.store.load_raw(key) {
            Ok(bytes) => bytes,
            Err(StoreError::NotFound(_)) => {
                return Err(ProfileStoreError::NotFound {
                    key: key.to_owned(),
                })
            }
            Err(err) => return Err(ProfileStoreError::Store(err)),
        };
        serde_json::from_slice(&bytes).map_err(|source| ProfileStoreError::Corrupt {
            key: key.to_owned(),
            source,
        })
    }

    /// Encode `profile` and replace the value at `key`.
    ///
    /// # Errors
    ///
    /// [`ProfileStoreError::Store`] when the substrate write fails.
    pub fn put(&self, key: &str, profile: &Profile) -> Result<(), ProfileStoreError> {
        let data = serde_json::to_vec(profile).map_err(|source| ProfileStoreError::Encode {
            key: key.to_owned(),
            source,
        })?;
        self.store
            .save_raw(key, &data)
            .map_err(ProfileStoreError::Store)?;
        debug!(key, bytes = data.len(), "profile written");
        Ok(())
    }
}
