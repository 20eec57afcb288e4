//! API token authentication middleware.
//!
//! Validates Bearer tokens and injects the caller identity. Supports both:
//! - `Authorization: Bearer {token}` headers (recommended)
//! - `?token={token}` query string parameters, URL-decoded before validation

use axum::{
    body::Body,
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::{db, error::Error, AppState};

/// Extract token from Authorization header or query string.
///
/// Priority:
/// 1. Authorization: Bearer {token} header
/// 2. ?token={token} query parameter
fn extract_token_from_request(req: &Request<Body>) -> Option<String> {
    if let Some(auth_header) = req.headers().get(AUTHORIZATION) {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                return Some(token.trim().to_string());
            }
        }
    }

    if let Some(query) = req.uri().query() {
        for part in query.split('&') {
            if let Some(token) = part.strip_prefix("token=") {
                if let Ok(decoded) = urlencoding::decode(token) {
                    return Some(decoded.into_owned());
                }
                return Some(token.to_string());
            }
        }
    }

    None
}

/// Middleware that requires a valid API token.
///
/// Injects [`AuthContext`](crate::middleware::AuthContext) into request
/// extensions. Handlers read the caller's user id from it; no route accepts
/// the identity as a request field.
///
/// # Errors
///
/// Returns 401 Unauthorized if:
/// - No Authorization header or token query parameter present
/// - Token prefix not found or hash doesn't match
/// - Token is expired or revoked
pub async fn require_token(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Error> {
    let token = extract_token_from_request(&req).ok_or(Error::Unauthenticated)?;

    let auth_context = match state.auth.validate_token(&token).await {
        Ok(ctx) => ctx,
        Err(e) => {
            warn!(path = %req.uri().path(), error = %e, "Rejected API token");
            return Err(e);
        }
    };

    debug!(user_id = %auth_context.user_id, "Authenticated request");

    // Update last_used_at (fire and forget - don't block the request)
    let pool = state.db.clone();
    let token_id = auth_context.token_id.clone();
    tokio::spawn(async move {
        let _ = db::update_api_token_last_used(&pool, &token_id).await;
    });

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
