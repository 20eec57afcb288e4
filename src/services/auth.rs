//! Auth service for users and API tokens.
//!
//! Token format: `medt_{prefix}_{secret}` where `{prefix}` is 8 characters
//! used for the database lookup and the whole token is stored only as a
//! SHA-256 hex digest.

use chrono::{Duration, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::config::AuthConfig;
use crate::db::{self, ApiToken, CreateApiToken, CreateUser, DbPool, User};
use crate::error::{Error, Result};
use crate::models::new_id;

/// Fixed token prefix used to recognise medtrack tokens.
pub const TOKEN_PREFIX: &str = "medt_";

const LOOKUP_PREFIX_LEN: usize = 8;
const SECRET_LEN: usize = 32;

/// Identity resolved from a valid token.
#[derive(Clone, Debug)]
pub struct AuthContext {
    /// Token used for this request (for audit logging)
    pub token_id: String,
    /// User that owns the token
    pub user_id: String,
}

/// A freshly minted token. `token` is the only time the secret is visible.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub id: String,
    pub name: String,
    pub token: String,
    pub expires_at: Option<String>,
}

/// Service for authentication and token management.
#[derive(Clone)]
pub struct AuthService {
    db: DbPool,
    config: AuthConfig,
}

impl AuthService {
    /// Create a new auth service.
    pub fn new(db: DbPool, config: AuthConfig) -> Self {
        Self { db, config }
    }

    /// Register a user, gated by the configured registration token.
    pub async fn register(
        &self,
        registration_token: &str,
        email: Option<String>,
        display_name: Option<String>,
    ) -> Result<(User, IssuedToken)> {
        let expected = self
            .config
            .registration_token
            .as_deref()
            .ok_or(Error::Forbidden)?;

        if !constant_time_eq(registration_token, expected) {
            warn!("Registration attempted with an invalid registration token");
            return Err(Error::InvalidCredentials);
        }

        let email = email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty());
        if let Some(ref email) = email {
            if !email.contains('@') {
                return Err(Error::Validation(
                    "The email field must be a valid email address.".into(),
                ));
            }
        }

        let user = db::create_user(
            &self.db,
            CreateUser {
                id: new_id(),
                email,
                display_name,
            },
        )
        .await?;

        let token = self.issue_token(&user.id, "Default").await?;

        info!(user_id = %user.id, "Registered user");

        Ok((user, token))
    }

    /// Mint a new API token for `user_id`.
    pub async fn issue_token(&self, user_id: &str, name: &str) -> Result<IssuedToken> {
        let prefix = nanoid::nanoid!(LOOKUP_PREFIX_LEN);
        let secret = nanoid::nanoid!(SECRET_LEN);
        let token = format!("{}{}_{}", TOKEN_PREFIX, prefix, secret);

        let expires_at = self
            .config
            .token_ttl_days
            .map(|days| Utc::now() + Duration::days(days));

        let stored = db::create_api_token(
            &self.db,
            CreateApiToken {
                id: new_id(),
                user_id: user_id.to_string(),
                name: name.to_string(),
                token_hash: hash_token(&token),
                token_prefix: prefix,
                expires_at,
            },
        )
        .await?;

        info!(user_id, token_id = %stored.id, "Issued API token");

        Ok(IssuedToken {
            id: stored.id,
            name: stored.name,
            token,
            expires_at: stored.expires_at,
        })
    }

    /// Validate a presented token and resolve the caller.
    pub async fn validate_token(&self, token: &str) -> Result<AuthContext> {
        let prefix = lookup_prefix(token).ok_or(Error::InvalidToken)?;
        let token_hash = hash_token(token);

        let candidates = db::get_api_tokens_by_prefix(&self.db, prefix).await?;
        let stored: ApiToken = candidates
            .into_iter()
            .find(|t| constant_time_eq(&t.token_hash, &token_hash))
            .ok_or(Error::InvalidToken)?;

        if stored.is_revoked() {
            return Err(Error::InvalidToken);
        }

        if stored.is_expired() {
            return Err(Error::TokenExpired);
        }

        Ok(AuthContext {
            token_id: stored.id,
            user_id: stored.user_id,
        })
    }

    /// Revoke one of the caller's tokens.
    pub async fn revoke_token(&self, token_id: &str, user_id: &str) -> Result<()> {
        db::revoke_api_token(&self.db, token_id, user_id).await?;
        info!(user_id, token_id, "Revoked API token");
        Ok(())
    }
}

/// Extract the lookup prefix from `medt_{prefix}_{secret}`.
fn lookup_prefix(token: &str) -> Option<&str> {
    let body = token.strip_prefix(TOKEN_PREFIX)?;
    // At least the prefix, a separator and one secret character
    if body.len() < LOOKUP_PREFIX_LEN + 2 || !body.is_char_boundary(LOOKUP_PREFIX_LEN) {
        return None;
    }
    Some(&body[..LOOKUP_PREFIX_LEN])
}

/// Hash a token using SHA-256.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}
