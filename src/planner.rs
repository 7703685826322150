//! Single-writer facade over the active profile
//!
//! Every mutation takes the book lock, applies the change, and hands the
//! resulting snapshot to the [`SnapshotStore`] before releasing it. A failed
//! save is logged and remembered; the in-memory state is kept as is.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::circuit::{CircuitItem, MoveDirection};
use crate::config::{PlannerConfig, StarterPlan};
use crate::insights::{
    exam_analysis_or_placeholder, study_insights_or_placeholder, ExamSummary, InsightGenerator,
    PerformanceSummary,
};
use crate::profile::{
    Profile, ProfileBook, ProfileError, SessionOutcome, SessionRecord, SessionResult,
};
use crate::review::{Difficulty, ReviewCard, ReviewStats};
use crate::storage::{JsonFileStore, SnapshotStore, StorageError};

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid operation: {0}")]
    InvalidOperation(#[from] ProfileError),
}

pub type Result<T> = std::result::Result<T, PlannerError>;

/// Summary of a profile for pickers and sidebars
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileEntry {
    pub id: Uuid,
    pub name: String,
    pub active: bool,
}

pub struct StudyPlanner {
    book: Mutex<ProfileBook>,
    store: Box<dyn SnapshotStore>,
    save_error: Mutex<Option<String>>,
}

impl StudyPlanner {
    /// Load the saved book or start from the starter plan.
    ///
    /// A snapshot that exists but cannot be read is an error, so a broken
    /// file is never silently replaced by a fresh plan.
    pub fn open(store: Box<dyn SnapshotStore>, starter: &StarterPlan) -> Result<Self> {
        let build_starter =
            || Profile::with_subjects(starter.name.clone(), starter.subjects.iter().cloned());

        let book = match store.load()? {
            Some(mut book) => {
                book.normalize(build_starter);
                log::info!("Loaded {} profile(s)", book.profiles.len());
                book
            }
            None => {
                log::info!("No snapshot found, starting plan '{}'", starter.name);
                ProfileBook::with_profile(build_starter())
            }
        };

        Ok(Self {
            book: Mutex::new(book),
            store,
            save_error: Mutex::new(None),
        })
    }

    /// Open the JSON snapshot described by `config`
    pub fn from_config(config: &PlannerConfig) -> Result<Self> {
        let path = config
            .snapshot_path()
            .ok_or(StorageError::DataDirNotFound)?;
        log::info!("Using snapshot at {}", path.display());
        Self::open(Box::new(JsonFileStore::new(path)), &config.starter_plan)
    }

    fn lock(&self) -> MutexGuard<'_, ProfileBook> {
        self.book.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn read<R>(&self, f: impl FnOnce(&ProfileBook) -> R) -> R {
        f(&*self.lock())
    }

    /// Read from the active profile; a book without profiles yields `R::default()`
    fn read_active<R: Default>(&self, f: impl FnOnce(&Profile) -> R) -> R {
        self.read(|book| book.active().map(f).unwrap_or_default())
    }

    fn mutate<R>(&self, f: impl FnOnce(&mut ProfileBook) -> R) -> R {
        let mut book = self.lock();
        let result = f(&mut *book);
        self.persist(&*book);
        result
    }

    fn persist(&self, book: &ProfileBook) {
        let outcome = match self.store.save(book) {
            Ok(()) => None,
            Err(e) => {
                log::error!("Failed to save snapshot: {}", e);
                Some(format!("Changes could not be saved: {}", e))
            }
        };
        *self.save_error.lock().unwrap_or_else(|e| e.into_inner()) = outcome;
    }

    /// Message for the user when the last save failed
    pub fn save_status(&self) -> Option<String> {
        self.save_error
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Copy of the whole book
    pub fn snapshot(&self) -> ProfileBook {
        self.read(|book| book.clone())
    }

    // ==================== Profiles ====================

    pub fn profiles(&self) -> Vec<ProfileEntry> {
        self.read(|book| {
            book.profiles
                .iter()
                .map(|p| ProfileEntry {
                    id: p.id,
                    name: p.name.clone(),
                    active: book.active().map(|a| a.id) == Some(p.id),
                })
                .collect()
        })
    }

    pub fn active_profile(&self) -> Option<Profile> {
        self.read(|book| book.active().cloned())
    }

    pub fn create_profile(&self, name: impl Into<String>) -> Uuid {
        let name = name.into();
        let id = self.mutate(|book| book.create_profile(name.clone()));
        log::info!("Created profile '{}' ({})", name, id);
        id
    }

    pub fn delete_profile(&self, id: Uuid) -> bool {
        self.mutate(|book| book.delete_profile(id))
    }

    pub fn switch_profile(&self, id: Uuid) -> bool {
        self.mutate(|book| book.switch_to(id))
    }

    // ==================== Circuit ====================

    pub fn add_subject(&self, name: impl Into<String>) -> Uuid {
        let name = name.into();
        self.mutate(|book| book.active_mut().circuit.add(name))
    }

    pub fn duplicate_subject(&self, id: Uuid) -> Option<Uuid> {
        self.mutate(|book| book.active_mut().circuit.duplicate(id))
    }

    pub fn delete_subject(&self, id: Uuid) -> bool {
        self.mutate(|book| book.active_mut().circuit.delete(id))
    }

    pub fn move_subject(&self, id: Uuid, direction: MoveDirection) -> bool {
        self.mutate(|book| book.active_mut().circuit.move_item(id, direction))
    }

    pub fn advance(&self, completed_id: Uuid) -> bool {
        self.mutate(|book| book.active_mut().circuit.advance(completed_id))
    }

    /// Restart the circuit, keeping history and cards
    pub fn reset_circuit(&self) {
        self.mutate(|book| book.active_mut().circuit.reset());
    }

    /// Restart the circuit and erase the plan's history, cards and exams
    pub fn reset_plan(&self) {
        self.mutate(|book| book.active_mut().reset_plan());
        log::info!("Plan reset");
    }

    /// The subject to study now and the one after it
    pub fn up_next(&self) -> (Option<CircuitItem>, Option<CircuitItem>) {
        self.read_active(|profile| {
            let circuit = &profile.circuit;
            (circuit.current().cloned(), circuit.following().cloned())
        })
    }

    // ==================== Sessions ====================

    pub fn finish_session(&self, result: SessionResult) -> Option<SessionRecord> {
        let now = Utc::now();
        self.mutate(|book| book.active_mut().finish_session(result, now).cloned())
    }

    pub fn finish_session_and_advance(&self, result: SessionResult) -> Option<SessionOutcome> {
        let now = Utc::now();
        let outcome = self.mutate(|book| book.active_mut().finish_session_and_advance(result, now));
        if let Some(outcome) = &outcome {
            log::info!(
                "Session complete, next up: {}",
                outcome.next_subject.as_deref().unwrap_or("-")
            );
        }
        outcome
    }

    pub fn previous_notes(&self, subject: &str) -> Option<String> {
        self.read_active(|profile| profile.last_notes_for(subject).map(str::to_string))
    }

    // ==================== Review cards ====================

    pub fn add_review_card(
        &self,
        subject: impl Into<String>,
        topic: impl Into<String>,
        notes: impl Into<String>,
    ) -> Uuid {
        let (subject, topic, notes) = (subject.into(), topic.into(), notes.into());
        let now = Utc::now();
        self.mutate(|book| {
            book.active_mut()
                .review_cards
                .add_card(subject, topic, notes, now)
        })
    }

    pub fn grade_card(&self, id: Uuid, difficulty: Difficulty) -> bool {
        let now = Utc::now();
        self.mutate(|book| book.active_mut().review_cards.grade(id, difficulty, now))
    }

    pub fn set_card_stage(&self, id: Uuid, stage: u8) -> bool {
        let now = Utc::now();
        self.mutate(|book| book.active_mut().review_cards.set_stage(id, stage, now))
    }

    pub fn promote_card(&self, id: Uuid) -> bool {
        let now = Utc::now();
        self.mutate(|book| book.active_mut().review_cards.promote(id, now))
    }

    pub fn delete_card(&self, id: Uuid) -> bool {
        self.mutate(|book| book.active_mut().review_cards.delete_card(id))
    }

    /// Cards of the active profile due at `now`
    pub fn due_cards(&self, now: DateTime<Utc>, subject: Option<&str>) -> Vec<ReviewCard> {
        self.read_active(|profile| {
            profile
                .review_cards
                .due_cards(now, subject)
                .cloned()
                .collect()
        })
    }

    pub fn pending_review_count(&self, now: DateTime<Utc>) -> usize {
        self.read_active(|profile| profile.review_cards.due_count(now))
    }

    pub fn review_stats(&self, now: DateTime<Utc>) -> ReviewStats {
        self.read_active(|profile| profile.review_cards.stats(now))
    }

    // ==================== Mock exams ====================

    pub fn add_mock_exam(
        &self,
        name: impl Into<String>,
        total_questions: u32,
        correct_answers: u32,
    ) -> Result<Uuid> {
        let name = name.into();
        let now = Utc::now();
        let id = self.mutate(|book| {
            book.active_mut()
                .add_mock_exam(name, total_questions, correct_answers, now)
        })?;
        Ok(id)
    }

    pub fn delete_mock_exam(&self, id: Uuid) -> bool {
        self.mutate(|book| book.active_mut().delete_mock_exam(id))
    }

    // ==================== Insights ====================

    pub fn performance_summary(&self) -> PerformanceSummary {
        self.read_active(|profile| PerformanceSummary::from_sessions(&profile.sessions))
    }

    pub fn exam_summary(&self) -> ExamSummary {
        self.read_active(|profile| ExamSummary::from_exams(&profile.mock_exams))
    }

    /// Study advice for the active profile. The lock is released before the
    /// generator is awaited.
    pub async fn study_insights(&self, generator: &dyn InsightGenerator) -> String {
        let summary = self.performance_summary();
        study_insights_or_placeholder(generator, &summary).await
    }

    pub async fn exam_analysis(&self, generator: &dyn InsightGenerator) -> String {
        let summary = self.exam_summary();
        exam_analysis_or_placeholder(generator, &summary).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread;

    use async_trait::async_trait;
    use chrono::Duration;
    use tempfile::TempDir;

    use crate::circuit::StudyStatus;
    use crate::insights::generator::{InsightError, STUDY_INSIGHTS_PLACEHOLDER};
    use crate::storage::MemoryStore;

    fn starter() -> StarterPlan {
        StarterPlan {
            name: "Plan".into(),
            subjects: vec!["Math".into(), "Law".into(), "Art".into()],
        }
    }

    fn planner() -> StudyPlanner {
        StudyPlanner::open(Box::new(MemoryStore::new()), &starter()).unwrap()
    }

    /// Store whose saves fail while `broken` is set
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        broken: AtomicBool,
    }

    impl SnapshotStore for Arc<FlakyStore> {
        fn load(&self) -> std::result::Result<Option<ProfileBook>, StorageError> {
            self.inner.load()
        }

        fn save(&self, book: &ProfileBook) -> std::result::Result<(), StorageError> {
            if self.broken.load(Ordering::SeqCst) {
                return Err(StorageError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "read-only",
                )));
            }
            self.inner.save(book)
        }
    }

    #[test]
    fn test_open_uses_starter_plan() {
        let planner = planner();
        let (current, following) = planner.up_next();

        assert_eq!(current.unwrap().subject_name, "Math");
        assert_eq!(following.unwrap().subject_name, "Law");
        assert_eq!(planner.profiles().len(), 1);
        assert!(planner.profiles()[0].active);
    }

    #[test]
    fn test_every_mutation_is_saved() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("profiles.json");
        let planner =
            StudyPlanner::open(Box::new(JsonFileStore::new(path.clone())), &starter()).unwrap();

        planner.add_subject("History");
        planner.finish_session_and_advance(SessionResult {
            questions: 5,
            correct: 4,
            notes: "derivatives".into(),
            duration_secs: 900,
        });

        let reopened = StudyPlanner::open(Box::new(JsonFileStore::new(path)), &starter()).unwrap();
        let profile = reopened.active_profile().unwrap();
        assert_eq!(profile.circuit.len(), 4);
        assert_eq!(profile.sessions.len(), 1);
        assert_eq!(profile.review_cards.len(), 1);
        assert_eq!(reopened.up_next().0.unwrap().subject_name, "Law");
    }

    #[test]
    fn test_corrupt_snapshot_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("profiles.json");
        std::fs::write(&path, "garbage").unwrap();

        let result = StudyPlanner::open(Box::new(JsonFileStore::new(path.clone())), &starter());
        assert!(matches!(result, Err(PlannerError::Storage(StorageError::Json(_)))));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "garbage");
    }

    #[test]
    fn test_empty_snapshot_gets_starter_plan() {
        let store = MemoryStore::new();
        let empty: ProfileBook = serde_json::from_str("{}").unwrap();
        store.save(&empty).unwrap();

        let planner = StudyPlanner::open(Box::new(store), &starter()).unwrap();
        let profile = planner.active_profile().unwrap();
        assert_eq!(profile.name, "Plan");
        assert_eq!(profile.circuit.len(), 3);
        assert_eq!(planner.up_next().0.unwrap().subject_name, "Math");
    }

    #[test]
    fn test_save_failure_keeps_state() {
        let store = Arc::new(FlakyStore::default());
        let planner = StudyPlanner::open(Box::new(Arc::clone(&store)), &starter()).unwrap();

        store.broken.store(true, Ordering::SeqCst);
        let id = planner.add_subject("History");
        assert!(planner.save_status().is_some());
        assert!(planner.active_profile().unwrap().circuit.get(id).is_some());

        store.broken.store(false, Ordering::SeqCst);
        planner.add_subject("Music");
        assert!(planner.save_status().is_none());
        assert_eq!(store.inner.load().unwrap().unwrap().active().unwrap().circuit.len(), 5);
    }

    #[test]
    fn test_session_card_is_due_and_gradable() {
        let planner = planner();
        let outcome = planner
            .finish_session_and_advance(SessionResult {
                questions: 10,
                correct: 6,
                notes: "integrals".into(),
                duration_secs: 1200,
            })
            .unwrap();
        let card_id = outcome.review_card_id.unwrap();

        let now = Utc::now();
        assert_eq!(planner.pending_review_count(now), 1);
        assert_eq!(planner.due_cards(now, Some("Math")).len(), 1);
        assert!(planner.due_cards(now, Some("Law")).is_empty());

        assert!(planner.grade_card(card_id, Difficulty::Medium));
        assert_eq!(planner.pending_review_count(Utc::now()), 0);
        assert_eq!(
            planner.pending_review_count(Utc::now() + Duration::hours(73)),
            1
        );
        assert_eq!(planner.previous_notes("Math").as_deref(), Some("integrals"));
    }

    #[test]
    fn test_profiles_are_isolated() {
        let planner = planner();
        let first = planner.active_profile().unwrap().id;
        planner.add_review_card("Math", "Limits", "");

        let second = planner.create_profile("Second");
        assert!(planner.active_profile().unwrap().circuit.is_empty());
        assert_eq!(planner.pending_review_count(Utc::now()), 0);
        planner.add_subject("Biology");

        assert!(planner.switch_profile(first));
        assert_eq!(planner.pending_review_count(Utc::now()), 1);
        assert_eq!(planner.active_profile().unwrap().circuit.len(), 3);

        assert!(planner.delete_profile(first));
        assert_eq!(planner.active_profile().unwrap().id, second);
        assert!(!planner.delete_profile(second));
    }

    #[test]
    fn test_circuit_operations() {
        let planner = planner();
        let math = planner.up_next().0.unwrap().id;

        let copy = planner.duplicate_subject(math).unwrap();
        assert!(planner.move_subject(copy, MoveDirection::Down));
        assert!(planner.advance(math));
        assert_eq!(planner.up_next().0.unwrap().subject_name, "Law");

        assert!(planner.delete_subject(copy));
        planner.reset_circuit();
        let profile = planner.active_profile().unwrap();
        assert_eq!(profile.circuit.items()[0].status, StudyStatus::Next);
        assert!(profile.circuit.items().iter().all(|i| i.study_count == 0));
    }

    #[test]
    fn test_mock_exams() {
        let planner = planner();
        assert!(matches!(
            planner.add_mock_exam("Exam", 10, 12),
            Err(PlannerError::InvalidOperation(_))
        ));

        let id = planner.add_mock_exam("Exam", 100, 70).unwrap();
        assert_eq!(planner.exam_summary().average_percentage, 70);
        assert!(planner.delete_mock_exam(id));
        assert!(planner.exam_summary().is_empty());
    }

    #[test]
    fn test_concurrent_writers_are_serialized() {
        let planner = Arc::new(planner());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let planner = Arc::clone(&planner);
                thread::spawn(move || {
                    for j in 0..10 {
                        planner.add_subject(format!("Subject {}-{}", i, j));
                        planner.finish_session_and_advance(SessionResult::default());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let profile = planner.active_profile().unwrap();
        assert_eq!(profile.circuit.len(), 83);
        assert_eq!(profile.sessions.len(), 80);
        let next = profile.circuit.items().iter().filter(|i| i.is_next()).count();
        assert_eq!(next, 1);
        let studied: u32 = profile.circuit.items().iter().map(|i| i.study_count).sum();
        assert_eq!(studied, 80);
    }

    struct FailingGenerator;

    #[async_trait]
    impl InsightGenerator for FailingGenerator {
        async fn study_insights(
            &self,
            _summary: &PerformanceSummary,
        ) -> crate::insights::generator::Result<String> {
            Err(InsightError::EmptyResponse)
        }

        async fn exam_analysis(
            &self,
            _summary: &ExamSummary,
        ) -> crate::insights::generator::Result<String> {
            Err(InsightError::EmptyResponse)
        }
    }

    #[tokio::test]
    async fn test_insight_failure_does_not_touch_state() {
        let planner = planner();
        planner.finish_session_and_advance(SessionResult {
            questions: 4,
            correct: 2,
            notes: String::new(),
            duration_secs: 60,
        });
        let before = planner.snapshot();

        let text = planner.study_insights(&FailingGenerator).await;
        assert_eq!(text, STUDY_INSIGHTS_PLACEHOLDER);
        assert_eq!(planner.snapshot(), before);
        assert_eq!(planner.performance_summary().overall_precision, 50);
    }
}
