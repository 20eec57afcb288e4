//! Authentication Routes
//!
//! Routes:
//! - POST /auth/register - Create a user with the registration token
//! - GET /auth/me - Get current user info
//! - POST /auth/tokens - Create a new API token
//! - DELETE /auth/tokens/:id - Revoke an API token

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::{self, User};
use crate::middleware::{require_token, AuthContext};
use crate::services::IssuedToken;
use crate::{AppState, Result};

/// Build authentication routes.
pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(get_current_user))
        .route("/tokens", post(create_token))
        .route("/tokens/:token_id", delete(revoke_token))
        .layer(middleware::from_fn_with_state(state, require_token));

    Router::new()
        .route("/register", post(register))
        .merge(protected)
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub registration_token: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: User,
    pub token: IssuedToken,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateTokenRequest {
    pub name: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Register a user and hand out their first token.
///
/// POST /auth/register
async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let (user, token) = state
        .auth
        .register(&request.registration_token, request.email, request.display_name)
        .await?;

    Ok((StatusCode::CREATED, Json(RegisterResponse { user, token })))
}

/// GET /auth/me
async fn get_current_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<User>> {
    let user = db::get_user(&state.db, &auth.user_id).await?;
    Ok(Json(user))
}

/// Mint another token for the caller.
///
/// POST /auth/tokens
async fn create_token(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    request: Option<Json<CreateTokenRequest>>,
) -> Result<impl IntoResponse> {
    let Json(request) = request.unwrap_or_default();
    let name = request
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "API token".to_string());

    let token = state.auth.issue_token(&auth.user_id, &name).await?;
    Ok((StatusCode::CREATED, Json(token)))
}

/// DELETE /auth/tokens/:token_id
async fn revoke_token(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(token_id): Path<String>,
) -> Result<StatusCode> {
    state.auth.revoke_token(&token_id, &auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
