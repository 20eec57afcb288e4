//! Data models for medtrack.
//!
//! Medicine records, their timers, and the request shapes used to create
//! and replace them.

mod medicine;
pub mod validation;

pub use medicine::*;

use uuid::Uuid;

/// Generate a new UUID
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}
