//! API Routes for medtrack
//!
//! This module combines all API routes into a single router.

mod auth;
pub mod envelope;
mod medicines;
pub mod status;

use axum::Router;

use crate::middleware::require_token;
use crate::AppState;

/// Build the complete API router.
///
/// Route structure:
/// - /auth/* - Registration and token management
/// - /medicines/* - Medicine records (token-protected)
/// - /health - Health checks (public)
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(status::routes())
        .nest("/auth", auth::routes(state.clone()))
        .nest("/medicines", protected_routes(state))
}

/// Routes that require a bearer token.
fn protected_routes(state: AppState) -> Router<AppState> {
    medicines::routes().layer(axum::middleware::from_fn_with_state(state, require_token))
}
