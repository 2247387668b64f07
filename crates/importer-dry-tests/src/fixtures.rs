// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Record builders and sample identifiers.

use importer_schema::{Inspection, Profile, Timestamp, Violation};

/// Sample GSTIN-style importer id used across suites.
pub const SAMPLE_IMPORTER: &str = "27AABCU9603R1ZN";

/// Timestamp used by fixtures that do not care about time.
pub const FIXTURE_INSTANT: &str = "2026-01-01T00:00:00Z";

/// Builder for [`Violation`] values.
#[derive(Clone, Debug)]
pub struct ViolationBuilder {
    violation: Violation,
}

impl ViolationBuilder {
    /// Violation `id` with a generic description, severity 1.
    pub fn new(id: &str) -> Self {
        Self {
            violation: Violation {
                violation_id: id.to_owned(),
                description: format!("violation {id}"),
                severity: 1,
                recorded_at: FIXTURE_INSTANT.to_owned(),
            },
        }
    }

    /// Set the description.
    pub fn description(mut self, description: &str) -> Self {
        self.violation.description = description.to_owned();
        self
    }

    /// Set the severity.
    pub fn severity(mut self, severity: i32) -> Self {
        self.violation.severity = severity;
        self
    }

    /// Set the recording instant.
    pub fn recorded_at(mut self, at: impl Into<Timestamp>) -> Self {
        self.violation.recorded_at = at.into();
        self
    }

    /// Finish.
    pub fn build(self) -> Violation {
        self.violation
    }
}

/// Violations for each id, in order.
pub fn violations(ids: &[&str]) -> Vec<Violation> {
    ids.iter().map(|id| ViolationBuilder::new(id).build()).collect()
}

/// Encode violations the way a caller would hand them to `update_raw`.
pub fn violation_history_json(history: &[Violation]) -> String {
    serde_json::to_string(history).unwrap_or_else(|_| "[]".to_owned())
}

/// Builder for stored [`Profile`] values, for planting records directly.
#[derive(Clone, Debug)]
pub struct ProfileBuilder {
    profile: Profile,
}

impl ProfileBuilder {
    /// Empty profile registered at [`FIXTURE_INSTANT`].
    pub fn new(importer_id: &str) -> Self {
        Self {
            profile: Profile::new(importer_id, 0.0, FIXTURE_INSTANT),
        }
    }

    /// Set the trust score.
    pub fn trust_score(mut self, score: f64) -> Self {
        self.profile.trust_score = score;
        self
    }

    /// Set the registration date.
    pub fn registered_at(mut self, at: impl Into<Timestamp>) -> Self {
        self.profile.registration_date = at.into();
        self
    }

    /// Append violations with the given ids.
    pub fn violations(mut self, ids: &[&str]) -> Self {
        self.profile.violation_history.extend(violations(ids));
        self
    }

    /// Append an inspection with the given outcome.
    pub fn inspection(mut self, inspection_id: &str, outcome: &str) -> Self {
        self.profile.inspection_logs.push(Inspection {
            inspection_id: inspection_id.to_owned(),
            outcome: outcome.to_owned(),
            inspector_id: "inspector-0".to_owned(),
            inspected_at: FIXTURE_INSTANT.to_owned(),
        });
        self
    }

    /// Finish.
    pub fn build(self) -> Profile {
        self.profile
    }

    /// Finish and encode as the store would.
    pub fn encode(self) -> Vec<u8> {
        serde_json::to_vec(&self.profile).unwrap_or_default()
    }
}
