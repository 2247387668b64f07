// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Invariant-enforcing mutation engine for importer compliance records.
//!
//! `importer-core` decides whether a proposed change to an importer
//! [`Profile`](importer_schema::Profile) is admissible and, if so, writes the
//! complete new record through a [`RecordStore`](importer_store::RecordStore).
//!
//! # Guarantees
//!
//! - `registration_date` is written once, at registration.
//! - `violation_history` never shrinks and never changes the `violation_id`
//!   at an existing index. Deleting a violation is always refused.
//! - Every transition is all-or-nothing: a rejection performs no write.
//! - Timestamps come from an injected [`Clock`], never from a global read.
//!
//! # Modules
//!
//! - [`registry`] - the operation surface ([`Registry`])
//! - [`validate`] - anti-fraud rules for [`ProfileUpdate`]
//! - [`score`] - the bounded trust score
//! - [`clock`] - time sources
#![forbid(unsafe_code)]

pub mod clock;
mod error;
pub mod registry;
pub mod score;
pub mod validate;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::LedgerError;
pub use registry::Registry;
pub use score::score;
pub use validate::ProfileUpdate;
