//! Service layer for medtrack.
//!
//! Contains the business logic behind the HTTP API:
//! - Medicine (validated, owner-scoped medicine and timer management)
//! - Auth (user registration and API token lifecycle)

mod auth;
mod medicine;

pub use auth::{hash_token, AuthContext, AuthService, IssuedToken, TOKEN_PREFIX};
pub use medicine::MedicineService;
