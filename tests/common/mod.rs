//! Shared setup for the HTTP integration tests.

#![allow(dead_code)]

use axum::http::HeaderValue;
use axum_test::TestServer;
use medtrack::api;
use medtrack::config::AuthConfig;
use medtrack::db::{self, DbPool, PoolConfig};
use medtrack::AppState;

pub const REGISTRATION_TOKEN: &str = "test-registration-token";

/// Test server plus direct access to the state behind it.
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

/// Create an in-memory database with the schema applied.
pub async fn setup_test_db() -> DbPool {
    let pool = db::create_pool_with_config(":memory:", PoolConfig::test())
        .await
        .expect("Failed to create test database");
    db::initialize_schema(&pool)
        .await
        .expect("Failed to initialize schema");
    pool
}

/// Build the full router over a fresh database.
pub async fn spawn_app() -> TestApp {
    let pool = setup_test_db().await;
    let state = AppState::with_pool(
        pool,
        AuthConfig {
            registration_token: Some(REGISTRATION_TOKEN.to_string()),
            token_ttl_days: None,
        },
    );

    let app = api::routes(state.clone()).with_state(state.clone());
    let server = TestServer::new(app).expect("Failed to start test server");

    TestApp { server, state }
}

impl TestApp {
    /// Register a user and return `(user_id, token)`.
    pub async fn register_user(&self, email: &str) -> (String, String) {
        let (user, issued) = self
            .state
            .auth
            .register(REGISTRATION_TOKEN, Some(email.to_string()), None)
            .await
            .expect("Failed to register test user");
        (user.id, issued.token)
    }
}

/// Bearer Authorization header value.
pub fn bearer_auth(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
}
