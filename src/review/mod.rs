//! Spaced review for Studyloop
//!
//! This module provides:
//! - Review cards with a coarse stage (1 day, 3 days, 7 days)
//! - Difficulty grading that picks the next stage directly
//! - The due queue and "how close to due" progress

pub mod algorithm;
pub mod models;
pub mod scheduler;

pub use models::*;
pub use scheduler::ReviewScheduler;
