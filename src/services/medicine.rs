//! Medicine service.
//!
//! The five medicine operations. Each validates its input first, then
//! addresses the store only through caller-scoped queries.

use tracing::{debug, info};

use crate::db::{self, DbPool, Owned};
use crate::error::Result;
use crate::models::{Medicine, MedicineId, MedicineInput};

/// Service for managing a user's medicines and their timers.
#[derive(Clone)]
pub struct MedicineService {
    db: DbPool,
}

impl MedicineService {
    /// Create a new medicine service.
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// Create a medicine with its initial timer set. Returns the new id.
    pub async fn create(&self, input: &MedicineInput, user_id: &str) -> Result<MedicineId> {
        let draft = input.validate()?;

        let id = db::insert_medicine(&self.db, user_id, &draft).await?;
        let id = MedicineId::new(id)?;

        info!(medicine_id = %id, user_id, timers = draft.timers.len(), "Created medicine");

        Ok(id)
    }

    /// List every medicine the caller owns.
    pub async fn list(&self, user_id: &str) -> Result<Vec<Medicine>> {
        let medicines = db::list_medicines(&self.db, user_id).await?;
        debug!(user_id, count = medicines.len(), "Listed medicines");
        Ok(medicines)
    }

    /// Get one of the caller's medicines.
    pub async fn get(&self, id: MedicineId, user_id: &str) -> Result<Medicine> {
        db::get_medicine(&self.db, Owned::new(id, user_id)).await
    }

    /// Replace a medicine's fields and its entire timer set.
    pub async fn update(&self, id: MedicineId, input: &MedicineInput, user_id: &str) -> Result<()> {
        let draft = input.validate()?;

        db::replace_medicine(&self.db, Owned::new(id, user_id), &draft).await?;

        info!(medicine_id = %id, user_id, timers = draft.timers.len(), "Updated medicine");

        Ok(())
    }

    /// Delete a medicine together with its timers.
    pub async fn delete(&self, id: MedicineId, user_id: &str) -> Result<()> {
        db::delete_medicine(&self.db, Owned::new(id, user_id)).await?;

        info!(medicine_id = %id, user_id, "Deleted medicine");

        Ok(())
    }
}
