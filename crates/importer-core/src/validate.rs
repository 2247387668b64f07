// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Anti-fraud rules for general-purpose profile updates.
//!
//! Two rules guard the protected fields:
//!
//! 1. `registration_date` is write-once. A non-empty proposal that differs
//!    from the stored value is rejected.
//! 2. `violation_history` is append-only. A proposal may not be shorter than
//!    the stored list, and every stored index must keep its `violation_id`.
//!
//! The history rule compares identity only, and only at indices inside the
//! stored length. Payload fields of existing entries are not compared.
//!
//! Schema validation of the proposed history happens earlier, in
//! [`ProfileUpdate::from_raw`], so malformed input is reported before either
//! rule runs.

use importer_schema::{parse_violation_history, Profile, Timestamp, Violation};

use crate::LedgerError;

/// A proposed change to the validator-governed fields. `None` means "leave
/// as is".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    /// Proposed registration date. Empty is treated like `None`.
    pub registration_date: Option<Timestamp>,
    /// Full replacement violation history.
    pub violation_history: Option<Vec<Violation>>,
}

impl ProfileUpdate {
    /// An update that only refreshes `last_updated`.
    pub fn none() -> Self {
        Self::default()
    }

    /// Propose a registration date.
    pub fn with_registration_date(mut self, date: impl Into<Timestamp>) -> Self {
        self.registration_date = Some(date.into());
        self
    }

    /// Propose a replacement violation history.
    pub fn with_violation_history(mut self, history: Vec<Violation>) -> Self {
        self.violation_history = Some(history);
        self
    }

    /// Build an update from loosely typed caller input. Empty strings mean
    /// "no change requested" for that field.
    ///
    /// # Errors
    ///
    /// [`LedgerError::MalformedInput`] when `violation_history_json` is
    /// non-empty and not an array of complete violations.
    pub fn from_raw(
        registration_date: &str,
        violation_history_json: &str,
    ) -> Result<Self, LedgerError> {
        let mut update = Self::none();
        if !registration_date.is_empty() {
            update.registration_date = Some(registration_date.to_owned());
        }
        if !violation_history_json.is_empty() {
            let history = parse_violation_history(violation_history_json)
                .map_err(LedgerError::MalformedInput)?;
            update.violation_history = Some(history);
        }
        Ok(update)
    }
}

/// Run every rule of `update` against `current`.
///
/// # Errors
///
/// The first violated rule, registration date first.
pub fn check_update(current: &Profile, update: &ProfileUpdate) -> Result<(), LedgerError> {
    if let Some(date) = update.registration_date.as_deref() {
        check_registration_date(current, date)?;
    }
    if let Some(history) = update.violation_history.as_deref() {
        check_violation_history(current, history)?;
    }
    Ok(())
}

/// Reject any non-empty `proposed` date that differs from the stored one.
///
/// # Errors
///
/// [`LedgerError::ImmutableField`] on mismatch.
pub fn check_registration_date(current: &Profile, proposed: &str) -> Result<(), LedgerError> {
    if proposed.is_empty() || proposed == current.registration_date {
        return Ok(());
    }
    Err(LedgerError::ImmutableField {
        importer_id: current.importer_id.clone(),
        field: "registration_date",
        current: current.registration_date.clone(),
        attempted: proposed.to_owned(),
    })
}

/// Require `proposed` to be at least as long as the stored history and to
/// keep every stored `violation_id` at its index.
///
/// # Errors
///
/// [`LedgerError::Shrinkage`] when shorter, [`LedgerError::Tamper`] at the
/// first diverging index.
pub fn check_violation_history(
    current: &Profile,
    proposed: &[Violation],
) -> Result<(), LedgerError> {
    let stored = &current.violation_history;
    if proposed.len() < stored.len() {
        return Err(LedgerError::Shrinkage {
            importer_id: current.importer_id.clone(),
            current: stored.len(),
            attempted: proposed.len(),
        });
    }
    let divergence = stored
        .iter()
        .zip(proposed)
        .position(|(old, new)| old.violation_id != new.violation_id);
    if let Some(index) = divergence {
        return Err(LedgerError::Tamper {
            importer_id: current.importer_id.clone(),
            index,
            expected: stored[index].violation_id.clone(),
            found: proposed[index].violation_id.clone(),
        });
    }
    Ok(())
}
