//! Study plans (profiles) and their session history

pub mod book;
pub mod models;
pub mod plan;

pub use models::*;
pub use plan::{ProfileError, SessionOutcome};
