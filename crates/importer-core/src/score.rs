// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Trust scoring.
//!
//! ```text
//! score = years * 10 + tier * 20 - violations * 15 + clean_inspections * 0.5
//! ```
//!
//! clamped to `[MIN_SCORE, MAX_SCORE]`. Arithmetic is done in `f64`, so no
//! input can overflow; clamping is the only guard.

/// Lower bound of every score.
pub const MIN_SCORE: f64 = 0.0;
/// Upper bound of every score.
pub const MAX_SCORE: f64 = 100.0;

/// Points per year of activity.
pub const YEAR_WEIGHT: f64 = 10.0;
/// Points per AEO tier.
pub const TIER_WEIGHT: f64 = 20.0;
/// Points deducted per violation.
pub const VIOLATION_PENALTY: f64 = 15.0;
/// Points per clean inspection.
pub const CLEAN_INSPECTION_WEIGHT: f64 = 0.5;

/// Compute a bounded trust score from raw registration inputs.
///
/// Pure and total. Negative inputs are taken at face value.
#[allow(clippy::cast_precision_loss)]
pub fn score(
    years_active: i64,
    aeo_tier: i64,
    violation_count: i64,
    clean_inspection_count: i64,
) -> f64 {
    let raw = years_active as f64 * YEAR_WEIGHT + aeo_tier as f64 * TIER_WEIGHT
        - violation_count as f64 * VIOLATION_PENALTY
        + clean_inspection_count as f64 * CLEAN_INSPECTION_WEIGHT;
    raw.clamp(MIN_SCORE, MAX_SCORE)
}
