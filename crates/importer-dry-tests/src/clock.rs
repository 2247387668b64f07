// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Deterministic clocks.

use importer_core::Clock;
use importer_schema::Timestamp;
use std::sync::{Arc, Mutex};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Unix seconds for `2026-01-01T00:00:00Z`.
pub const DEFAULT_EPOCH_SECS: i64 = 1_767_225_600;

/// Clock whose instant is set by the test. Clones share the instant.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Arc<Mutex<Timestamp>>,
}

impl ManualClock {
    /// Start at `instant`.
    pub fn new(instant: impl Into<Timestamp>) -> Self {
        Self {
            now: Arc::new(Mutex::new(instant.into())),
        }
    }

    /// Move to `instant`.
    pub fn set(&self, instant: impl Into<Timestamp>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = instant.into();
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

/// Clock that advances by a fixed step on every read, starting at
/// [`DEFAULT_EPOCH_SECS`] unless told otherwise.
#[derive(Clone, Debug)]
pub struct TickingClock {
    next: Arc<Mutex<i64>>,
    step_secs: i64,
}

impl TickingClock {
    /// One-second ticks from the default epoch.
    pub fn new() -> Self {
        Self::starting_at(DEFAULT_EPOCH_SECS, 1)
    }

    /// Ticks of `step_secs` starting at unix second `start`.
    pub fn starting_at(start: i64, step_secs: i64) -> Self {
        Self {
            next: Arc::new(Mutex::new(start)),
            step_secs,
        }
    }

    /// Instant the next read will return.
    pub fn peek(&self) -> Timestamp {
        format_secs(*self.next.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

impl Default for TickingClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TickingClock {
    fn now(&self) -> Timestamp {
        let mut next = self.next.lock().unwrap_or_else(|e| e.into_inner());
        let current = *next;
        *next += self.step_secs;
        format_secs(current)
    }
}

fn format_secs(secs: i64) -> Timestamp {
    OffsetDateTime::from_unix_timestamp(secs)
        .ok()
        .and_then(|t| t.format(&Rfc3339).ok())
        .unwrap_or_else(|| secs.to_string())
}
