//! Studyloop: a study-cycle planner with spaced review
//!
//! Two small engines do the real work:
//! - [`circuit::CircuitRotator`] rotates through an ordered list of subjects
//! - [`review::ReviewScheduler`] decides which review cards are due
//!
//! [`planner::StudyPlanner`] ties them to profiles, persists a snapshot after
//! every change, and feeds aggregates to an optional insight service.

pub mod circuit;
pub mod config;
pub mod insights;
pub mod planner;
pub mod profile;
pub mod review;
pub mod storage;

pub use circuit::{CircuitItem, CircuitRotator, MoveDirection, StudyStatus};
pub use config::PlannerConfig;
pub use insights::{GeminiInsightGenerator, InsightGenerator};
pub use planner::{PlannerError, StudyPlanner};
pub use profile::{Profile, ProfileBook, SessionResult};
pub use review::{Difficulty, ReviewCard, ReviewScheduler};
pub use storage::{JsonFileStore, MemoryStore, SnapshotStore};

/// Route `log` output to stderr, filtered by `RUST_LOG` (default `info`).
/// Calling it more than once is harmless.
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("Logger already initialized");
    }
}
