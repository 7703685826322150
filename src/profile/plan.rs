//! Study sessions, history and mock exams for one profile

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::models::*;
use crate::circuit::{CircuitItem, CircuitRotator};
use crate::review::ReviewScheduler;

#[derive(Error, Debug, PartialEq)]
pub enum ProfileError {
    #[error("Mock exam needs a name")]
    MissingExamName,

    #[error("Correct answers ({correct}) exceed total questions ({total})")]
    TooManyCorrect { correct: u32, total: u32 },
}

/// Result of finishing a session and moving the circuit on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOutcome {
    /// Slot that was just studied
    pub completed_id: Uuid,
    /// Review card created from the session notes, if any
    pub review_card_id: Option<Uuid>,
    /// Subject now marked NEXT
    pub next_subject: Option<String>,
}

impl Profile {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            circuit: CircuitRotator::new(),
            sessions: Vec::new(),
            mock_exams: Vec::new(),
            review_cards: ReviewScheduler::new(),
            wrong_questions: Vec::new(),
        }
    }

    pub fn with_subjects<I, S>(name: String, subjects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut profile = Self::new(name);
        profile.circuit = CircuitRotator::from_subjects(subjects);
        profile
    }

    /// Repair state loaded from a snapshot
    pub fn normalize(&mut self) {
        self.circuit.normalize();
    }

    /// The slot the learner is studying now
    pub fn current_subject(&self) -> Option<&CircuitItem> {
        self.circuit.current()
    }

    /// Log a session for the current subject without moving the circuit
    pub fn finish_session(&mut self, result: SessionResult, now: DateTime<Utc>) -> Option<&SessionRecord> {
        let subject = self.current_subject()?.subject_name.clone();
        self.sessions.push(SessionRecord::new(subject, result, now));
        self.sessions.last()
    }

    /// Log a session, turn its notes into a review card, and advance the circuit
    pub fn finish_session_and_advance(
        &mut self,
        result: SessionResult,
        now: DateTime<Utc>,
    ) -> Option<SessionOutcome> {
        let current = self.current_subject()?;
        let completed_id = current.id;
        let subject = current.subject_name.clone();

        let review_card_id = if result.notes.trim().is_empty() {
            None
        } else {
            Some(self.review_cards.add_card(
                subject.clone(),
                SESSION_CARD_TOPIC,
                result.notes.clone(),
                now,
            ))
        };

        self.sessions.push(SessionRecord::new(subject, result, now));
        self.circuit.advance(completed_id);

        Some(SessionOutcome {
            completed_id,
            review_card_id,
            next_subject: self.current_subject().map(|item| item.subject_name.clone()),
        })
    }

    /// Notes from the most recent session of `subject`
    pub fn last_notes_for(&self, subject: &str) -> Option<&str> {
        self.sessions
            .iter()
            .rev()
            .find(|record| record.subject == subject)
            .and_then(|record| record.notes.as_deref())
    }

    pub fn add_mock_exam(
        &mut self,
        name: String,
        total_questions: u32,
        correct_answers: u32,
        now: DateTime<Utc>,
    ) -> Result<Uuid, ProfileError> {
        if name.trim().is_empty() {
            return Err(ProfileError::MissingExamName);
        }
        if correct_answers > total_questions {
            return Err(ProfileError::TooManyCorrect {
                correct: correct_answers,
                total: total_questions,
            });
        }

        let exam = MockExam {
            id: Uuid::new_v4(),
            name,
            total_questions,
            correct_answers,
            taken_at: now,
        };
        let id = exam.id;
        self.mock_exams.push(exam);
        Ok(id)
    }

    pub fn delete_mock_exam(&mut self, id: Uuid) -> bool {
        let before = self.mock_exams.len();
        self.mock_exams.retain(|exam| exam.id != id);
        self.mock_exams.len() != before
    }

    /// Restart the circuit and wipe all history of this plan
    pub fn reset_plan(&mut self) {
        self.circuit.reset();
        self.sessions.clear();
        self.mock_exams.clear();
        self.review_cards = ReviewScheduler::new();
        self.wrong_questions.clear();
    }
}
