//! medtrack - Personal Medication Tracker
//!
//! Stores each user's medicines together with their daily reminder timers
//! and serves them over a token-authenticated JSON API.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;

pub use config::config;
pub use error::{Error, Result};
pub use state::AppState;
