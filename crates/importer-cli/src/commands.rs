// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Subcommand definitions and dispatch onto the registry.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use importer_core::{Clock, Registry};
use importer_schema::Profile;
use importer_store::RecordStore;
use serde::Serialize;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Register a new importer and compute its trust score.
    #[command(allow_negative_numbers = true)]
    Register {
        importer_id: String,
        #[arg(long, default_value_t = 0)]
        years_active: i64,
        #[arg(long, default_value_t = 0)]
        aeo_tier: i64,
        #[arg(long, default_value_t = 0)]
        violations: i64,
        #[arg(long, default_value_t = 0)]
        clean_inspections: i64,
    },
    /// Print the stored profile.
    Get { importer_id: String },
    /// Print the stored trust score.
    TrustScore { importer_id: String },
    /// Append a violation.
    #[command(allow_negative_numbers = true)]
    AddViolation {
        importer_id: String,
        violation_id: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value_t = 0)]
        severity: i32,
    },
    /// Append an inspection log entry.
    LogInspection {
        importer_id: String,
        inspection_id: String,
        #[arg(long)]
        outcome: String,
        #[arg(long)]
        inspector_id: String,
    },
    /// Append an AEO certificate.
    AddCertificate {
        importer_id: String,
        certificate_id: String,
        #[arg(long)]
        tier: i32,
        #[arg(long)]
        issued_by: String,
        #[arg(long)]
        expires_at: String,
    },
    /// Apply a guarded update to the registration date or violation history.
    Update {
        importer_id: String,
        /// Proposed registration date; must equal the stored one.
        #[arg(long, default_value = "")]
        registration_date: String,
        /// Full proposed violation history as a JSON array.
        #[arg(long, conflicts_with = "violation_history_file")]
        violation_history: Option<String>,
        /// Read the proposed violation history from a file.
        #[arg(long)]
        violation_history_file: Option<PathBuf>,
    },
    /// Attempt to delete a violation. Always refused.
    DeleteViolation {
        importer_id: String,
        violation_id: String,
    },
}

/// Result of a subcommand, serialized as JSON on stdout.
#[derive(Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Output {
    Profile(Box<Profile>),
    Score {
        importer_id: String,
        trust_score: f64,
    },
}

impl From<Profile> for Output {
    fn from(profile: Profile) -> Self {
        Self::Profile(Box::new(profile))
    }
}

/// Execute `cmd` against `registry`.
pub fn run<S, C>(registry: &mut Registry<S, C>, cmd: Command) -> Result<Output>
where
    S: RecordStore,
    C: Clock,
{
    let output = match cmd {
        Command::Register {
            importer_id,
            years_active,
            aeo_tier,
            violations,
            clean_inspections,
        } => registry
            .register(
                &importer_id,
                years_active,
                aeo_tier,
                violations,
                clean_inspections,
            )?
            .into(),
        Command::Get { importer_id } => registry.get_importer(&importer_id)?.into(),
        Command::TrustScore { importer_id } => {
            let trust_score = registry.trust_score(&importer_id)?;
            Output::Score {
                importer_id,
                trust_score,
            }
        }
        Command::AddViolation {
            importer_id,
            violation_id,
            description,
            severity,
        } => registry
            .add_violation(&importer_id, &violation_id, &description, severity)?
            .into(),
        Command::LogInspection {
            importer_id,
            inspection_id,
            outcome,
            inspector_id,
        } => registry
            .log_inspection(&importer_id, &inspection_id, &outcome, &inspector_id)?
            .into(),
        Command::AddCertificate {
            importer_id,
            certificate_id,
            tier,
            issued_by,
            expires_at,
        } => registry
            .add_aeo_certificate(&importer_id, &certificate_id, tier, &issued_by, &expires_at)?
            .into(),
        Command::Update {
            importer_id,
            registration_date,
            violation_history,
            violation_history_file,
        } => {
            let history = match (violation_history, violation_history_file) {
                (Some(json), _) => json,
                (None, Some(path)) => fs::read_to_string(&path)
                    .with_context(|| format!("read violation history {}", path.display()))?,
                (None, None) => String::new(),
            };
            registry
                .update_raw(&importer_id, &registration_date, &history)?
                .into()
        }
        Command::DeleteViolation {
            importer_id,
            violation_id,
        } => match registry.delete_violation(&importer_id, &violation_id)? {},
    };
    Ok(output)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use importer_core::{FixedClock, LedgerError};
    use importer_store::MemoryStore;

    fn registry() -> Registry<MemoryStore, FixedClock> {
        Registry::with_clock(
            MemoryStore::new(),
            FixedClock::parse("2026-05-01T00:00:00Z").unwrap(),
        )
    }

    fn register(registry: &mut Registry<MemoryStore, FixedClock>, id: &str) {
        run(
            registry,
            Command::Register {
                importer_id: id.into(),
                years_active: 7,
                aeo_tier: 1,
                violations: 0,
                clean_inspections: 20,
            },
        )
        .unwrap();
    }

    #[test]
    fn trust_score_reports_stored_value() {
        let mut reg = registry();
        register(&mut reg, "A");
        let out = run(
            &mut reg,
            Command::TrustScore {
                importer_id: "A".into(),
            },
        )
        .unwrap();
        assert_eq!(
            out,
            Output::Score {
                importer_id: "A".into(),
                trust_score: 100.0
            }
        );
    }

    #[test]
    fn update_without_history_only_refreshes() {
        let mut reg = registry();
        register(&mut reg, "A");
        let out = run(
            &mut reg,
            Command::Update {
                importer_id: "A".into(),
                registration_date: String::new(),
                violation_history: None,
                violation_history_file: None,
            },
        )
        .unwrap();
        let Output::Profile(profile) = out else {
            unreachable!("update returns the profile");
        };
        assert!(profile.violation_history.is_empty());
        assert_eq!(profile.last_updated, "2026-05-01T00:00:00Z");
    }

    #[test]
    fn update_reads_history_file() {
        let mut reg = registry();
        register(&mut reg, "A");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, "[]").unwrap();
        let out = run(
            &mut reg,
            Command::Update {
                importer_id: "A".into(),
                registration_date: String::new(),
                violation_history: None,
                violation_history_file: Some(path),
            },
        );
        assert!(out.is_ok());
    }

    #[test]
    fn delete_violation_surfaces_ledger_error() {
        let mut reg = registry();
        register(&mut reg, "A");
        let err = run(
            &mut reg,
            Command::DeleteViolation {
                importer_id: "A".into(),
                violation_id: "V1".into(),
            },
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LedgerError>(),
            Some(LedgerError::DeletionProhibited { .. })
        ));
    }
}
