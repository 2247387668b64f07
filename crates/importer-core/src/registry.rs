// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Importer registry: the state-transition operations over stored profiles.
//!
//! Every mutation follows the same shape: read the current profile (or
//! confirm absence), build the proposed profile in memory, validate, then
//! write the complete record once. A rejected or failed transition performs no
//! write, so stored bytes stay exactly as they were.
//!
//! Mutating methods take `&mut self`. One registry therefore runs one
//! transition at a time; ordering across processes is the job of whatever
//! sequences writes in front of the store.

use std::convert::Infallible;

use importer_schema::{Certificate, Inspection, Profile, Timestamp, Violation};
use importer_store::{ProfileStore, RecordStore};
use tracing::{info, instrument, warn};

use crate::clock::{Clock, SystemClock};
use crate::score::score;
use crate::validate::{check_update, ProfileUpdate};
use crate::LedgerError;

/// Importer registry over a record store and an injected clock.
pub struct Registry<S, C = SystemClock> {
    profiles: ProfileStore<S>,
    clock: C,
}

impl<S> Registry<S, SystemClock> {
    /// Registry stamped by the system clock.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S, C> Registry<S, C> {
    /// Registry stamped by `clock`.
    pub fn with_clock(store: S, clock: C) -> Self {
        Self {
            profiles: ProfileStore::new(store),
            clock,
        }
    }

    /// Borrow the underlying record store.
    pub fn store(&self) -> &S {
        self.profiles.inner()
    }

    /// Borrow the clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Consume the registry and return the record store.
    pub fn into_store(self) -> S {
        self.profiles.into_inner()
    }
}

impl<S, C> Registry<S, C>
where
    S: RecordStore,
    C: Clock,
{
    /// Create the profile for `importer_id` with a score derived from the
    /// supplied inputs.
    ///
    /// # Errors
    ///
    /// [`LedgerError::AlreadyExists`] if the importer is registered, or a
    /// store error.
    #[instrument(skip(self))]
    pub fn register(
        &mut self,
        importer_id: &str,
        years_active: i64,
        aeo_tier: i64,
        violations: i64,
        clean_inspections: i64,
    ) -> Result<Profile, LedgerError> {
        if self.profiles.exists(importer_id)? {
            warn!("registration refused: importer already exists");
            return Err(LedgerError::AlreadyExists {
                importer_id: importer_id.to_owned(),
            });
        }
        let now = self.clock.now();
        let trust_score = score(years_active, aeo_tier, violations, clean_inspections);
        let profile = Profile::new(importer_id, trust_score, &now);
        self.profiles.put(importer_id, &profile)?;
        info!(trust_score, registered_at = %now, "importer registered");
        Ok(profile)
    }

    /// Fetch the full profile.
    ///
    /// # Errors
    ///
    /// [`LedgerError::NotFound`], [`LedgerError::CorruptRecord`], or a store
    /// error.
    #[instrument(skip(self))]
    pub fn get_importer(&self, importer_id: &str) -> Result<Profile, LedgerError> {
        Ok(self.profiles.get(importer_id)?)
    }

    /// Stored trust score. Never recomputed after registration.
    ///
    /// # Errors
    ///
    /// Same as [`get_importer`](Self::get_importer).
    #[instrument(skip(self))]
    pub fn trust_score(&self, importer_id: &str) -> Result<f64, LedgerError> {
        Ok(self.profiles.get(importer_id)?.trust_score)
    }

    /// Append a violation recorded now. Duplicate ids are accepted.
    ///
    /// # Errors
    ///
    /// [`LedgerError::NotFound`] or a store error.
    #[instrument(skip(self, description))]
    pub fn add_violation(
        &mut self,
        importer_id: &str,
        violation_id: &str,
        description: &str,
        severity: i32,
    ) -> Result<Profile, LedgerError> {
        let profile = self.append(importer_id, |profile, now| {
            profile.violation_history.push(Violation {
                violation_id: violation_id.to_owned(),
                description: description.to_owned(),
                severity,
                recorded_at: now.clone(),
            });
        })?;
        info!(
            history_len = profile.violation_history.len(),
            "violation recorded"
        );
        Ok(profile)
    }

    /// Append an inspection logged now.
    ///
    /// # Errors
    ///
    /// [`LedgerError::NotFound`] or a store error.
    #[instrument(skip(self))]
    pub fn log_inspection(
        &mut self,
        importer_id: &str,
        inspection_id: &str,
        outcome: &str,
        inspector_id: &str,
    ) -> Result<Profile, LedgerError> {
        let profile = self.append(importer_id, |profile, now| {
            profile.inspection_logs.push(Inspection {
                inspection_id: inspection_id.to_owned(),
                outcome: outcome.to_owned(),
                inspector_id: inspector_id.to_owned(),
                inspected_at: now.clone(),
            });
        })?;
        info!(
            log_len = profile.inspection_logs.len(),
            "inspection logged"
        );
        Ok(profile)
    }

    /// Append an AEO certificate issued now.
    ///
    /// # Errors
    ///
    /// [`LedgerError::NotFound`] or a store error.
    #[instrument(skip(self))]
    pub fn add_aeo_certificate(
        &mut self,
        importer_id: &str,
        certificate_id: &str,
        tier: i32,
        issued_by: &str,
        expires_at: &str,
    ) -> Result<Profile, LedgerError> {
        let profile = self.append(importer_id, |profile, now| {
            profile.aeo_certificates.push(Certificate {
                certificate_id: certificate_id.to_owned(),
                tier,
                issued_by: issued_by.to_owned(),
                issued_at: now.clone(),
                expires_at: expires_at.to_owned(),
            });
        })?;
        info!(
            certificate_count = profile.aeo_certificates.len(),
            "certificate recorded"
        );
        Ok(profile)
    }

    /// Apply a validated update. `last_updated` is refreshed even when no
    /// governed field changes.
    ///
    /// # Errors
    ///
    /// [`LedgerError::NotFound`], any anti-fraud rejection from
    /// [`check_update`], or a store error.
    #[instrument(skip(self, update), fields(
        registration_date = update.registration_date.as_deref(),
        proposed_history_len = update.violation_history.as_ref().map(Vec::len),
    ))]
    pub fn update(
        &mut self,
        importer_id: &str,
        update: ProfileUpdate,
    ) -> Result<Profile, LedgerError> {
        let mut profile = self.profiles.get(importer_id)?;
        if let Err(err) = check_update(&profile, &update) {
            warn!(error = %err, "update rejected");
            return Err(err);
        }
        // An accepted registration date always equals the stored one.
        if let Some(history) = update.violation_history {
            profile.violation_history = history;
        }
        profile.last_updated = self.clock.now();
        self.profiles.put(importer_id, &profile)?;
        info!(
            history_len = profile.violation_history.len(),
            "profile updated"
        );
        Ok(profile)
    }

    /// [`update`](Self::update) from loosely typed input; empty strings mean
    /// "no change".
    ///
    /// # Errors
    ///
    /// [`LedgerError::MalformedInput`] before any store access, then as
    /// [`update`](Self::update).
    pub fn update_raw(
        &mut self,
        importer_id: &str,
        registration_date: &str,
        violation_history_json: &str,
    ) -> Result<Profile, LedgerError> {
        let update = ProfileUpdate::from_raw(registration_date, violation_history_json)?;
        self.update(importer_id, update)
    }

    /// Violation records can never be deleted. Always fails, for any key,
    /// without touching the store; the success type is uninhabited.
    ///
    /// # Errors
    ///
    /// Always [`LedgerError::DeletionProhibited`].
    #[instrument(skip(self))]
    pub fn delete_violation(
        &self,
        importer_id: &str,
        violation_id: &str,
    ) -> Result<Infallible, LedgerError> {
        let err = LedgerError::DeletionProhibited {
            importer_id: importer_id.to_owned(),
            violation_id: violation_id.to_owned(),
        };
        warn!(error = %err, "violation deletion refused");
        Err(err)
    }

    fn append<F>(&mut self, importer_id: &str, edit: F) -> Result<Profile, LedgerError>
    where
        F: FnOnce(&mut Profile, &Timestamp),
    {
        let mut profile = self.profiles.get(importer_id)?;
        let now = self.clock.now();
        edit(&mut profile, &now);
        profile.last_updated = now;
        self.profiles.put(importer_id, &profile)?;
        Ok(profile)
    }
}
