//! Study circuit for Studyloop
//!
//! This module provides:
//! - Subject slots with PENDING / NEXT / LAST_STUDIED status
//! - Round-robin advancement on session completion
//! - Manual add, duplicate, delete, reorder and reset

pub mod models;
pub mod rotator;

pub use models::*;
pub use rotator::CircuitRotator;
