//! Profile data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::circuit::CircuitRotator;
use crate::review::ReviewScheduler;

/// Name given to a profile created without one
pub const DEFAULT_PROFILE_NAME: &str = "My study plan";

/// Topic given to review cards created when a circuit session ends with notes
pub const SESSION_CARD_TOPIC: &str = "Cycle session";

/// What the learner reports when a study session ends
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResult {
    pub questions: u32,
    pub correct: u32,
    #[serde(default)]
    pub notes: String,
    pub duration_secs: u64,
}

/// One entry of the performance history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub subject: String,
    #[serde(default)]
    pub correct: u32,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub duration_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(subject: String, result: SessionResult, recorded_at: DateTime<Utc>) -> Self {
        let notes = Some(result.notes).filter(|n| !n.trim().is_empty());
        Self {
            subject,
            correct: result.correct,
            total: result.questions,
            duration_secs: result.duration_secs,
            notes,
            recorded_at,
        }
    }
}

/// A full practice exam score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockExam {
    pub id: Uuid,
    pub name: String,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub taken_at: DateTime<Utc>,
}

/// A missed question kept for later. Carried through snapshots as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrongQuestion {
    pub id: Uuid,
    pub subject: String,
    pub question_ref: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub stage: u8,
    pub created_at: DateTime<Utc>,
    pub last_review_date: DateTime<Utc>,
}

/// A study plan: one circuit, its review cards and its history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub circuit: CircuitRotator,
    #[serde(default)]
    pub sessions: Vec<SessionRecord>,
    #[serde(default)]
    pub mock_exams: Vec<MockExam>,
    #[serde(default)]
    pub review_cards: ReviewScheduler,
    #[serde(default)]
    pub wrong_questions: Vec<WrongQuestion>,
}

/// Everything the planner persists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileBook {
    #[serde(default)]
    pub profiles: Vec<Profile>,
    #[serde(default)]
    pub active_profile_id: Uuid,
}
