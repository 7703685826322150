//! Motivational text insights
//!
//! The planner only exposes aggregates here. Generation happens behind the
//! [`InsightGenerator`] trait and any failure degrades to a placeholder.

pub mod generator;
pub mod models;

pub use generator::{
    exam_analysis_or_placeholder, study_insights_or_placeholder, GeminiInsightGenerator,
    InsightError, InsightGenerator,
};
pub use models::*;
