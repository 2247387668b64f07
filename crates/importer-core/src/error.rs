// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error taxonomy for ledger operations.
//!
//! Every message starts with a bracketed code so rejections can be audited by
//! grepping logs. Anti-fraud rejections carry the importer id plus the current
//! and attempted values.

use importer_store::{ProfileStoreError, StoreError};
use thiserror::Error;

/// Errors returned by [`Registry`](crate::Registry) operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The importer must exist but does not.
    #[error("[NOT_FOUND] importer {importer_id} not found")]
    NotFound {
        /// Requested importer id.
        importer_id: String,
    },

    /// The importer must not exist but does.
    #[error("[ALREADY_EXISTS] importer {importer_id} already exists")]
    AlreadyExists {
        /// Importer id that was already registered.
        importer_id: String,
    },

    /// Underlying store read or write failed. Not retried.
    #[error("[STORE_ERROR] {0}")]
    Store(#[from] StoreError),

    /// Persisted bytes do not decode to a profile.
    #[error("[CORRUPT_RECORD] stored profile for {importer_id} does not match the schema: {source}")]
    CorruptRecord {
        /// Importer whose record is unreadable.
        importer_id: String,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },

    /// Profile could not be encoded for writing.
    #[error("[ENCODE_FAILED] profile for {importer_id} could not be encoded: {source}")]
    Encode {
        /// Importer being written.
        importer_id: String,
        /// Encoder error.
        #[source]
        source: serde_json::Error,
    },

    /// Caller-supplied violation history does not match the schema.
    #[error("[MALFORMED_INPUT] violation history does not match the schema: {0}")]
    MalformedInput(#[source] serde_json::Error),

    /// Attempt to change a write-once field.
    #[error("[ANTI_FRAUD_IMMUTABLE] {field} of importer {importer_id} is immutable and cannot be modified (current: {current}, attempted: {attempted})")]
    ImmutableField {
        /// Importer targeted by the update.
        importer_id: String,
        /// Persisted field name.
        field: &'static str,
        /// Stored value.
        current: String,
        /// Value the caller tried to write.
        attempted: String,
    },

    /// Attempt to drop entries from the violation history.
    #[error("[ANTI_FRAUD_SHRINKAGE] violation_history of importer {importer_id} is append-only and cannot shrink (current: {current}, attempted: {attempted})")]
    Shrinkage {
        /// Importer targeted by the update.
        importer_id: String,
        /// Stored history length.
        current: usize,
        /// Proposed history length.
        attempted: usize,
    },

    /// Attempt to rewrite an existing violation entry.
    #[error("[ANTI_FRAUD_TAMPER] violation_history of importer {importer_id} is append-only; entry at index {index} cannot change (expected: {expected}, found: {found})")]
    Tamper {
        /// Importer targeted by the update.
        importer_id: String,
        /// First diverging position.
        index: usize,
        /// Stored `violation_id` at `index`.
        expected: String,
        /// Proposed `violation_id` at `index`.
        found: String,
    },

    /// Violation deletion is never permitted.
    #[error("[ANTI_FRAUD_DELETE] deletion of violation_history records is prohibited: violation {violation_id} cannot be removed from importer {importer_id}")]
    DeletionProhibited {
        /// Importer named by the caller.
        importer_id: String,
        /// Violation named by the caller.
        violation_id: String,
    },
}

impl LedgerError {
    /// `true` for the rejections that guard history against falsification.
    pub fn is_anti_fraud(&self) -> bool {
        matches!(
            self,
            Self::ImmutableField { .. }
                | Self::Shrinkage { .. }
                | Self::Tamper { .. }
                | Self::DeletionProhibited { .. }
        )
    }
}

impl From<ProfileStoreError> for LedgerError {
    fn from(err: ProfileStoreError) -> Self {
        match err {
            ProfileStoreError::NotFound { key } => Self::NotFound { importer_id: key },
            ProfileStoreError::Corrupt { key, source } => Self::CorruptRecord {
                importer_id: key,
                source,
            },
            ProfileStoreError::Encode { key, source } => Self::Encode {
                importer_id: key,
                source,
            },
            ProfileStoreError::Store(err) => Self::Store(err),
        }
    }
}
