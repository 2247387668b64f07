// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Persisted record shapes for importer compliance profiles.
//!
//! One [`Profile`] is stored per importer, keyed by [`Profile::importer_id`].
//! Field names are part of the persisted format and must not be renamed: every
//! party replaying the ledger decodes the same JSON object.
//!
//! # Field Invariants
//!
//! - `importer_id` and `registration_date` are write-once.
//! - `violation_history` is append-only; existing entries keep their
//!   `violation_id` at their original index forever.
//! - `aeo_certificates` and `inspection_logs` are append-only by convention.
//!
//! The types here only describe the shape. Enforcement lives in
//! `importer-core`, which is the sole writer.
#![forbid(unsafe_code)]

use serde::{Deserialize, Deserializer, Serialize};

/// Timestamps are carried as RFC 3339 strings, exactly as persisted.
pub type Timestamp = String;

/// Full compliance record for one importer.
///
/// Collections and `trust_score` default when absent from the stored bytes so
/// that sparse records written by earlier writers still decode. Collections
/// stored as `null` decode as empty. The identity
/// fields have no default: a record without them is corrupt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Primary key. Never changes after registration.
    pub importer_id: String,
    /// Set once at registration.
    pub registration_date: Timestamp,
    /// Authorized Economic Operator certificates, in issue order.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub aeo_certificates: Vec<Certificate>,
    /// Recorded violations, in recording order.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub violation_history: Vec<Violation>,
    /// Inspection outcomes, in logging order.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub inspection_logs: Vec<Inspection>,
    /// Bounded score in `[0, 100]`, fixed at registration.
    #[serde(default)]
    pub trust_score: f64,
    /// Refreshed by every accepted mutation.
    #[serde(default)]
    pub last_updated: Timestamp,
}

impl Profile {
    /// Fresh profile with empty collections, stamped with `now` on both
    /// timestamps.
    pub fn new(importer_id: impl Into<String>, trust_score: f64, now: &str) -> Self {
        Self {
            importer_id: importer_id.into(),
            registration_date: now.to_owned(),
            aeo_certificates: Vec::new(),
            violation_history: Vec::new(),
            inspection_logs: Vec::new(),
            trust_score,
            last_updated: now.to_owned(),
        }
    }

    /// Violation ids in stored order.
    pub fn violation_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.violation_history
            .iter()
            .map(|v| v.violation_id.as_str())
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// An AEO certificate held by the importer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    /// Issuer-assigned identifier.
    pub certificate_id: String,
    /// Certification tier.
    pub tier: i32,
    /// Issuing authority.
    pub issued_by: String,
    /// Stamped by the ledger when the certificate is recorded.
    pub issued_at: Timestamp,
    /// Expiry as supplied by the issuer.
    pub expires_at: Timestamp,
}

/// A recorded compliance violation.
///
/// `violation_id` is the identity compared by the append-only check; the other
/// fields are payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Identity key.
    pub violation_id: String,
    /// Free-form description.
    pub description: String,
    /// Severity rating.
    pub severity: i32,
    /// When the violation was recorded.
    pub recorded_at: Timestamp,
}

/// A logged inspection outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inspection {
    /// Inspection identifier.
    pub inspection_id: String,
    /// Outcome label (e.g. `"clean"`, `"flagged"`).
    pub outcome: String,
    /// Inspecting officer.
    pub inspector_id: String,
    /// When the inspection was logged.
    pub inspected_at: Timestamp,
}

/// Parse a caller-supplied replacement violation history.
///
/// The input must be a JSON array of complete [`Violation`] objects. Any
/// structural mismatch is returned as-is so the caller can surface it as a
/// malformed-input rejection before any history rule runs.
///
/// # Errors
///
/// Returns the underlying [`serde_json::Error`] when `json` is not an array of
/// violations.
pub fn parse_violation_history(json: &str) -> Result<Vec<Violation>, serde_json::Error> {
    serde_json::from_str(json)
}
