//! Fixed-table spaced repetition.
//!
//! Each card sits at a position in [`INTERVAL_DAYS`]. It becomes due once the
//! interval at that position has elapsed since it was last updated. A recalled
//! card moves one step up the table, saturating at the top; a lapsed card
//! drops back to the one-day step.

use chrono::{DateTime, Duration, Utc};

use crate::models::{IntervalIndex, Outcome};

/// Days that must pass since the last update before a card is due again.
pub const INTERVAL_DAYS: [i64; 8] = [0, 1, 2, 4, 8, 16, 32, 64];

pub fn interval(index: IntervalIndex) -> Duration {
    Duration::days(INTERVAL_DAYS[index.get()])
}

pub fn due_at(index: IntervalIndex, updated_at: DateTime<Utc>) -> DateTime<Utc> {
    updated_at + interval(index)
}

/// Inclusive: a card is due at the exact instant its interval elapses.
pub fn is_due(index: IntervalIndex, updated_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now >= due_at(index, updated_at)
}

pub fn next_interval_on_success(index: IntervalIndex) -> IntervalIndex {
    IntervalIndex::new(index.get() + 1).unwrap_or(IntervalIndex::LAST)
}

pub fn next_interval_on_failure(_index: IntervalIndex) -> IntervalIndex {
    IntervalIndex::LAPSE
}

pub fn next_interval(index: IntervalIndex, outcome: Outcome) -> IntervalIndex {
    match outcome {
        Outcome::Recalled => next_interval_on_success(index),
        Outcome::Lapsed => next_interval_on_failure(index),
    }
}
