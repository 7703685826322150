//! Data models for the study circuit

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Position of a slot in the rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StudyStatus {
    /// Waiting for its turn
    Pending,
    /// The subject to study now
    Next,
    /// The most recently completed subject
    LastStudied,
}

impl Default for StudyStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Direction for a manual reorder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

/// One slot in the circuit. The same subject may appear in several slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitItem {
    pub id: Uuid,
    pub subject_name: String,
    #[serde(default)]
    pub status: StudyStatus,
    /// How many sessions of this slot were completed
    #[serde(default)]
    pub study_count: u32,
}

impl CircuitItem {
    pub fn new(subject_name: String, status: StudyStatus) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject_name,
            status,
            study_count: 0,
        }
    }

    /// Copy of this slot with a fresh id, pending and never studied
    pub fn duplicate(&self) -> Self {
        Self::new(self.subject_name.clone(), StudyStatus::Pending)
    }

    pub fn is_next(&self) -> bool {
        self.status == StudyStatus::Next
    }
}
