//! Configuration management for medtrack.
//!
//! Loads configuration from environment variables (and a `.env` file when
//! present) into a process-wide instance.

use std::env;
use std::sync::OnceLock;

/// Global configuration instance
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Get the global configuration
pub fn config() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}

/// Initialize configuration (call once at startup)
pub fn init() -> &'static Config {
    config()
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// Shared secret required by `POST /auth/register`. Registration is
    /// disabled when unset.
    pub registration_token: Option<String>,
    /// Lifetime of newly issued API tokens. `None` means no expiry.
    pub token_ttl_days: Option<i64>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            server: ServerConfig {
                host: env_or("HOST", "0.0.0.0"),
                port: env_or("PORT", "8080").parse().unwrap_or(8080),
            },
            database: DatabaseConfig {
                path: env_or("DATABASE_PATH", "./data/medtrack.db"),
            },
            auth: AuthConfig {
                registration_token: env::var("REGISTRATION_TOKEN")
                    .ok()
                    .filter(|t| !t.is_empty()),
                token_ttl_days: env::var("TOKEN_TTL_DAYS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .filter(|days: &i64| *days > 0),
            },
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
