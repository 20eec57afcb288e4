//! Application state for medtrack.
//!
//! Contains the shared state that is passed to all handlers.

use crate::config::AuthConfig;
use crate::db::DbPool;
use crate::services::{AuthService, MedicineService};
use crate::{config, Result};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: DbPool,
    /// Medicine management service.
    pub medicines: MedicineService,
    /// Authentication service.
    pub auth: AuthService,
}

impl AppState {
    /// Create a new application state from the global configuration.
    pub async fn new() -> Result<Self> {
        let config = config::config();

        // Initialize database
        let db = crate::db::init_pool(&config.database.path).await?;

        // Initialize database schema
        crate::db::initialize_schema(&db).await?;

        Ok(Self::with_pool(db, config.auth.clone()))
    }

    /// Build the state around an existing pool.
    pub fn with_pool(db: DbPool, auth: AuthConfig) -> Self {
        let medicines = MedicineService::new(db.clone());
        let auth = AuthService::new(db.clone(), auth);

        Self {
            db,
            medicines,
            auth,
        }
    }
}
