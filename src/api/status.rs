//! Status Routes
//!
//! Routes:
//! - GET /health - Health check including database connectivity
//! - GET /health/live - Liveness check (server responding)

use std::time::Instant;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{db, AppState};

/// Build status routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness_check))
}

// ============================================================================
// Response Types
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub database: DatabaseCheck,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Serialize)]
pub struct DatabaseCheck {
    pub connected: bool,
    pub latency_ms: u64,
    pub pool_size: u32,
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check.
///
/// GET /health
///
/// Returns 200 when the database answers, 503 otherwise.
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let start = Instant::now();
    let connected = match db::health_check(&state.db).await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(error = %e, "Database health check failed");
            false
        }
    };
    let latency_ms = start.elapsed().as_millis() as u64;

    let (code, status) = if connected {
        (StatusCode::OK, HealthStatus::Healthy)
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, HealthStatus::Unhealthy)
    };

    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION").into(),
            timestamp: Utc::now(),
            database: DatabaseCheck {
                connected,
                latency_ms,
                pool_size: state.db.size(),
            },
        }),
    )
}

/// Liveness check.
///
/// GET /health/live
async fn liveness_check() -> StatusCode {
    StatusCode::OK
}
