//! Fixed-tier review intervals
//!
//! Each stage maps to a fixed wait, chosen directly by the learner's rating:
//! - Stage 1: 24 hours
//! - Stage 2: 72 hours
//! - Stage 3: 168 hours
//!
//! Stage 0 and anything outside the table fall back to 24 hours.

use chrono::{DateTime, Utc};

use super::models::ReviewCard;

/// How far in the past a new card's last review is placed
pub const PRE_AGE_HOURS: i64 = 25;

/// Highest stage a card can be promoted to
pub const MAX_STAGE: u8 = 4;

const FALLBACK_INTERVAL_HOURS: f64 = 24.0;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Hours that must pass at `stage` before a card is due
pub fn interval_hours(stage: u8) -> f64 {
    match stage {
        0 | 1 => 24.0,
        2 => 72.0,
        3 => 168.0,
        _ => FALLBACK_INTERVAL_HOURS,
    }
}

/// Fractional hours between the last review and `now`; negative if `now` is earlier
pub fn elapsed_hours(now: DateTime<Utc>, last_review: DateTime<Utc>) -> f64 {
    now.signed_duration_since(last_review).num_milliseconds() as f64 / MILLIS_PER_HOUR
}

pub fn is_due(card: &ReviewCard, now: DateTime<Utc>) -> bool {
    elapsed_hours(now, card.last_review_date) >= interval_hours(card.stage)
}

/// How close a card is to being due, in `[0, 1]`
pub fn progress_fraction(card: &ReviewCard, now: DateTime<Utc>) -> f64 {
    let ratio = elapsed_hours(now, card.last_review_date) / interval_hours(card.stage);
    ratio.clamp(0.0, 1.0)
}

/// Hours until the card is due, zero once it is
pub fn hours_left(card: &ReviewCard, now: DateTime<Utc>) -> f64 {
    (interval_hours(card.stage) - elapsed_hours(now, card.last_review_date)).max(0.0)
}

/// Stage reached by one step of promotion
pub fn promoted_stage(stage: u8) -> u8 {
    if stage < MAX_STAGE {
        stage + 1
    } else {
        MAX_STAGE
    }
}
