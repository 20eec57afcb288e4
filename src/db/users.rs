//! User and API token database queries.
//!
//! Users are the owners of medicine records. They authenticate with API
//! tokens whose SHA-256 hash is stored alongside a short lookup prefix.

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::DbPool;

// ============================================================================
// Types
// ============================================================================

/// User record from the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub created_at: String,
}

/// Input for creating a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// API token record. The plaintext token is never stored.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ApiToken {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub token_prefix: String,
    #[serde(skip_serializing)]
    pub token_hash: String,
    pub created_at: String,
    pub last_used_at: Option<String>,
    pub expires_at: Option<String>,
    pub revoked_at: Option<String>,
}

impl ApiToken {
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    pub fn is_expired(&self) -> bool {
        if let Some(ref expires) = self.expires_at {
            if let Ok(dt) = DateTime::parse_from_rfc3339(expires) {
                return dt < Utc::now();
            }
        }
        false
    }
}

/// Input for creating an API token.
#[derive(Debug, Clone)]
pub struct CreateApiToken {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub token_hash: String,
    pub token_prefix: String,
    pub expires_at: Option<DateTime<Utc>>,
}

// ============================================================================
// User Queries
// ============================================================================

/// Create a new user.
pub async fn create_user(pool: &DbPool, input: CreateUser) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, email, display_name)
        VALUES (?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&input.id)
    .bind(&input.email)
    .bind(&input.display_name)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => Error::AlreadyExists(
            format!("User with email {} already exists", input.email.as_deref().unwrap_or("")),
        ),
        _ => Error::Database(e),
    })
}

/// Get a user by ID.
pub async fn get_user(pool: &DbPool, id: &str) -> Result<User> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("User not found: {}", id)))
}

// ============================================================================
// API Token Queries
// ============================================================================

/// Create a new API token.
pub async fn create_api_token(pool: &DbPool, input: CreateApiToken) -> Result<ApiToken> {
    let expires_at = input.expires_at.map(|dt| dt.to_rfc3339());

    sqlx::query_as::<_, ApiToken>(
        r#"
        INSERT INTO api_tokens (id, user_id, name, token_hash, token_prefix, expires_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&input.id)
    .bind(&input.user_id)
    .bind(&input.name)
    .bind(&input.token_hash)
    .bind(&input.token_prefix)
    .bind(&expires_at)
    .fetch_one(pool)
    .await
    .map_err(Error::Database)
}

/// Get API tokens by prefix.
/// Uses idx_api_tokens_prefix index.
pub async fn get_api_tokens_by_prefix(pool: &DbPool, prefix: &str) -> Result<Vec<ApiToken>> {
    sqlx::query_as::<_, ApiToken>(
        r#"
        SELECT * FROM api_tokens
        WHERE token_prefix = ?
        "#,
    )
    .bind(prefix)
    .fetch_all(pool)
    .await
    .map_err(Error::Database)
}

/// Update token's last_used_at timestamp.
pub async fn update_api_token_last_used(pool: &DbPool, id: &str) -> Result<()> {
    sqlx::query("UPDATE api_tokens SET last_used_at = datetime('now') WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Revoke one of a user's tokens. Tokens of other users are reported as
/// not found.
pub async fn revoke_api_token(pool: &DbPool, id: &str, user_id: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE api_tokens SET revoked_at = datetime('now')
        WHERE id = ? AND user_id = ? AND revoked_at IS NULL
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("API token not found: {}", id)));
    }

    Ok(())
}
