//! Data models for review cards

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::algorithm::PRE_AGE_HOURS;

fn default_stage() -> u8 {
    1
}

/// A topic the learner wants to revisit on a spaced schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCard {
    pub id: Uuid,
    pub subject: String,
    pub topic: String,
    #[serde(default)]
    pub notes: String,
    /// Interval tier: 1 = 1 day, 2 = 3 days, 3 = 7 days, 4 = promoted past the table
    #[serde(default = "default_stage")]
    pub stage: u8,
    pub created_at: DateTime<Utc>,
    pub last_review_date: DateTime<Utc>,
}

impl ReviewCard {
    /// Create a stage 1 card that is already due.
    ///
    /// `last_review_date` is set 25 hours before `now`, one hour past the
    /// stage 1 interval, so the card shows up in the queue right away.
    /// `created_at` keeps the real creation time.
    pub fn new(subject: String, topic: String, notes: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject,
            topic,
            notes,
            stage: 1,
            created_at: now,
            last_review_date: now - Duration::hours(PRE_AGE_HOURS),
        }
    }
}

/// Self-rated recall difficulty for a review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Next review in 7 days
    Easy,
    /// Next review in 3 days
    Medium,
    /// Next review in 1 day
    Hard,
}

impl Difficulty {
    pub fn stage(self) -> u8 {
        match self {
            Self::Easy => 3,
            Self::Medium => 2,
            Self::Hard => 1,
        }
    }
}

/// Counts for the review screen and the pending badge
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_cards: usize,
    pub due_cards: usize,
    /// Cards per stage, index 0 holds anything outside 1..=4
    pub cards_by_stage: [usize; 5],
}
