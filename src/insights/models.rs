//! Read-only aggregates handed to the insight service

use serde::{Deserialize, Serialize};

use crate::profile::{MockExam, SessionRecord};

/// Correct/total for one subject across all sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectPerformance {
    pub name: String,
    pub correct: u32,
    pub total: u32,
    /// Rounded accuracy, 0-100
    pub percentage: u32,
}

/// Aggregated study history of a profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    /// Per subject, in order of first session
    pub subjects: Vec<SubjectPerformance>,
    pub session_count: usize,
    pub total_correct: u32,
    pub total_questions: u32,
    pub total_duration_secs: u64,
    /// Rounded overall accuracy, 0-100
    pub overall_precision: u32,
}

fn ratio(correct: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        f64::from(correct) / f64::from(total)
    }
}

fn percentage(correct: u32, total: u32) -> u32 {
    (ratio(correct, total) * 100.0).round() as u32
}

impl PerformanceSummary {
    pub fn from_sessions(sessions: &[SessionRecord]) -> Self {
        let mut subjects: Vec<SubjectPerformance> = Vec::new();
        let mut summary = Self {
            session_count: sessions.len(),
            ..Self::default()
        };

        for record in sessions {
            summary.total_correct = summary.total_correct.saturating_add(record.correct);
            summary.total_questions = summary.total_questions.saturating_add(record.total);
            summary.total_duration_secs = summary
                .total_duration_secs
                .saturating_add(record.duration_secs);

            match subjects.iter_mut().find(|s| s.name == record.subject) {
                Some(entry) => {
                    entry.correct = entry.correct.saturating_add(record.correct);
                    entry.total = entry.total.saturating_add(record.total);
                }
                None => subjects.push(SubjectPerformance {
                    name: record.subject.clone(),
                    correct: record.correct,
                    total: record.total,
                    percentage: 0,
                }),
            }
        }

        for entry in &mut subjects {
            entry.percentage = percentage(entry.correct, entry.total);
        }
        summary.subjects = subjects;
        summary.overall_precision = percentage(summary.total_correct, summary.total_questions);
        summary
    }

    pub fn is_empty(&self) -> bool {
        self.session_count == 0
    }
}

/// One mock exam score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamScore {
    pub name: String,
    pub correct_answers: u32,
    pub total_questions: u32,
    pub percentage: u32,
}

/// Mock exam results in the order they were taken
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamSummary {
    pub exams: Vec<ExamScore>,
    pub average_percentage: u32,
    pub best_percentage: u32,
}

impl ExamSummary {
    pub fn from_exams(exams: &[MockExam]) -> Self {
        let scores: Vec<ExamScore> = exams
            .iter()
            .map(|exam| ExamScore {
                name: exam.name.clone(),
                correct_answers: exam.correct_answers,
                total_questions: exam.total_questions,
                percentage: percentage(exam.correct_answers, exam.total_questions),
            })
            .collect();

        // Mean of the raw ratios, rounded once
        let average_percentage = if exams.is_empty() {
            0
        } else {
            let sum: f64 = exams
                .iter()
                .map(|exam| ratio(exam.correct_answers, exam.total_questions))
                .sum();
            (sum / exams.len() as f64 * 100.0).round() as u32
        };
        let best_percentage = scores.iter().map(|s| s.percentage).max().unwrap_or(0);

        Self {
            exams: scores,
            average_percentage,
            best_percentage,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.exams.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn record(subject: &str, correct: u32, total: u32, duration_secs: u64) -> SessionRecord {
        SessionRecord {
            subject: subject.to_string(),
            correct,
            total,
            duration_secs,
            notes: None,
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn test_performance_summary() {
        let sessions = vec![
            record("Math", 7, 10, 600),
            record("Law", 3, 4, 300),
            record("Math", 2, 10, 900),
        ];

        let summary = PerformanceSummary::from_sessions(&sessions);
        assert_eq!(summary.session_count, 3);
        assert_eq!(summary.total_duration_secs, 1800);
        assert_eq!(summary.total_correct, 12);
        assert_eq!(summary.total_questions, 24);
        assert_eq!(summary.overall_precision, 50);

        assert_eq!(summary.subjects.len(), 2);
        assert_eq!(summary.subjects[0].name, "Math");
        assert_eq!(summary.subjects[0].correct, 9);
        assert_eq!(summary.subjects[0].total, 20);
        assert_eq!(summary.subjects[0].percentage, 45);
        assert_eq!(summary.subjects[1].percentage, 75);
    }

    #[test]
    fn test_summary_without_questions() {
        let summary = PerformanceSummary::from_sessions(&[record("Math", 0, 0, 60)]);
        assert_eq!(summary.overall_precision, 0);
        assert_eq!(summary.subjects[0].percentage, 0);
        assert!(!summary.is_empty());
        assert!(PerformanceSummary::from_sessions(&[]).is_empty());
    }

    fn exam(correct: u32, total: u32) -> MockExam {
        MockExam {
            id: Uuid::new_v4(),
            name: "Exam".to_string(),
            total_questions: total,
            correct_answers: correct,
            taken_at: Utc::now(),
        }
    }

    #[test]
    fn test_exam_summary() {
        let summary = ExamSummary::from_exams(&[exam(60, 100), exam(80, 100)]);
        assert_eq!(summary.average_percentage, 70);
        assert_eq!(summary.best_percentage, 80);
        assert!(ExamSummary::from_exams(&[]).is_empty());
    }

    #[test]
    fn test_exam_average_rounds_once() {
        // 12.5%, 12.5% and 0%: the mean of the ratios is 8.33%
        let summary = ExamSummary::from_exams(&[exam(1, 8), exam(1, 8), exam(0, 1)]);
        assert_eq!(summary.average_percentage, 8);
        assert_eq!(summary.best_percentage, 13);
    }

    #[test]
    fn test_exam_without_questions_counts_as_zero() {
        let summary = ExamSummary::from_exams(&[exam(0, 0), exam(50, 100)]);
        assert_eq!(summary.average_percentage, 25);
    }

    #[test]
    fn test_summary_totals_saturate() {
        let sessions = vec![
            record("Math", u32::MAX, u32::MAX, u64::MAX),
            record("Math", 5, 10, 60),
        ];

        let summary = PerformanceSummary::from_sessions(&sessions);
        assert_eq!(summary.total_correct, u32::MAX);
        assert_eq!(summary.total_questions, u32::MAX);
        assert_eq!(summary.total_duration_secs, u64::MAX);
        assert_eq!(summary.subjects[0].correct, u32::MAX);
    }
}
