//! Middleware for medtrack.
//!
//! - `token_auth` - API token validation; every medicine route sits behind it

mod token_auth;

pub use token_auth::require_token;

pub use crate::services::AuthContext;
