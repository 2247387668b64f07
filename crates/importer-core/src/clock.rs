// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Injected time source.
//!
//! The registry never reads the system clock itself. Each mutation asks its
//! [`Clock`] exactly once, so replaying the same inputs with the same clock
//! reproduces the same records byte for byte. Callers must supply
//! non-decreasing instants.

use importer_schema::Timestamp;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Source of mutation timestamps.
pub trait Clock {
    /// Current instant as an RFC 3339 string.
    fn now(&self) -> Timestamp;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

/// Wall-clock time in UTC, truncated to whole seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let now = OffsetDateTime::now_utc();
        let now = now.replace_nanosecond(0).unwrap_or(now);
        format_rfc3339(now)
    }
}

/// Always returns the same instant. Used for deterministic replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedClock(Timestamp);

impl FixedClock {
    /// Pin the clock to `instant`, which must be RFC 3339.
    ///
    /// # Errors
    ///
    /// Returns the parse error when `instant` is not RFC 3339.
    pub fn parse(instant: &str) -> Result<Self, time::error::Parse> {
        let parsed = OffsetDateTime::parse(instant, &Rfc3339)?;
        Ok(Self(format_rfc3339(parsed.to_offset(time::UtcOffset::UTC))))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0.clone()
    }
}

fn format_rfc3339(instant: OffsetDateTime) -> Timestamp {
    instant
        .format(&Rfc3339)
        .unwrap_or_else(|_| instant.unix_timestamp().to_string())
}
