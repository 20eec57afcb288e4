//! Medicine and timer database queries.
//!
//! Every query that addresses a single medicine takes an [`Owned`] scope, so
//! the owner predicate is always part of the statement. Writes that touch the
//! medicine and its timers run in one transaction which rolls back when
//! dropped without a commit.

use std::collections::HashMap;

use sqlx::{SqliteConnection, SqliteExecutor};

use crate::models::{Medicine, MedicineDraft, MedicineId, Timer, TimerDraft, MEDICINE_NOT_FOUND};
use crate::{Error, Result};

use super::DbPool;

/// A medicine id bound to the user who must own it.
#[derive(Debug, Clone, Copy)]
pub struct Owned<'a> {
    id: MedicineId,
    user_id: &'a str,
}

impl<'a> Owned<'a> {
    pub fn new(id: MedicineId, user_id: &'a str) -> Self {
        Self { id, user_id }
    }

    pub fn id(&self) -> MedicineId {
        self.id
    }

    pub fn user_id(&self) -> &'a str {
        self.user_id
    }
}

fn not_found() -> Error {
    Error::NotFound(MEDICINE_NOT_FOUND.to_string())
}

// ============================================================================
// Writes
// ============================================================================

/// Insert a medicine and its timers for `user_id`. Returns the new id.
pub async fn insert_medicine(pool: &DbPool, user_id: &str, draft: &MedicineDraft) -> Result<i64> {
    let mut tx = pool.begin().await?;

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO medicines (name, pieces, description, start_date, end_date, user_id)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&draft.name)
    .bind(draft.pieces)
    .bind(&draft.description)
    .bind(draft.start_date)
    .bind(draft.end_date)
    .bind(user_id)
    .fetch_one(&mut *tx)
    .await?;

    insert_timers(&mut tx, id, &draft.timers).await?;

    tx.commit().await?;

    Ok(id)
}

/// Overwrite a medicine's fields and replace its whole timer set.
///
/// The owner check is the `UPDATE` itself: when it matches no row the
/// transaction is dropped before anything else runs.
pub async fn replace_medicine(
    pool: &DbPool,
    scope: Owned<'_>,
    draft: &MedicineDraft,
) -> Result<()> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE medicines
        SET name = ?, pieces = ?, description = ?, start_date = ?, end_date = ?,
            updated_at = datetime('now')
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(&draft.name)
    .bind(draft.pieces)
    .bind(&draft.description)
    .bind(draft.start_date)
    .bind(draft.end_date)
    .bind(scope.id().get())
    .bind(scope.user_id())
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(not_found());
    }

    sqlx::query("DELETE FROM medicine_timers WHERE medicine_id = ?")
        .bind(scope.id().get())
        .execute(&mut *tx)
        .await?;

    insert_timers(&mut tx, scope.id().get(), &draft.timers).await?;

    tx.commit().await?;

    Ok(())
}

/// Delete a medicine. Its timers go with it through the foreign key cascade.
pub async fn delete_medicine(pool: &DbPool, scope: Owned<'_>) -> Result<()> {
    let result = sqlx::query("DELETE FROM medicines WHERE id = ? AND user_id = ?")
        .bind(scope.id().get())
        .bind(scope.user_id())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(not_found());
    }

    Ok(())
}

async fn insert_timers(
    conn: &mut SqliteConnection,
    medicine_id: i64,
    timers: &[TimerDraft],
) -> Result<()> {
    for timer in timers {
        sqlx::query(
            r#"
            INSERT INTO medicine_timers (medicine_id, label, time)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(medicine_id)
        .bind(&timer.label)
        .bind(timer.time_string())
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

// ============================================================================
// Reads
// ============================================================================

/// Get one medicine with its timers.
///
/// Both reads share one transaction so a concurrent replace is seen either
/// entirely or not at all.
pub async fn get_medicine(pool: &DbPool, scope: Owned<'_>) -> Result<Medicine> {
    let mut tx = pool.begin().await?;

    let mut medicine = sqlx::query_as::<_, Medicine>(
        "SELECT * FROM medicines WHERE id = ? AND user_id = ?",
    )
    .bind(scope.id().get())
    .bind(scope.user_id())
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(not_found)?;

    medicine.timers = list_timers(&mut *tx, medicine.id).await?;

    tx.commit().await?;

    Ok(medicine)
}

/// List a user's medicines in insertion order, each with its timers.
///
/// Timers for the whole list are fetched with a single query, in the same
/// transaction as the medicines.
pub async fn list_medicines(pool: &DbPool, user_id: &str) -> Result<Vec<Medicine>> {
    let mut tx = pool.begin().await?;

    let mut medicines = sqlx::query_as::<_, Medicine>(
        "SELECT * FROM medicines WHERE user_id = ? ORDER BY id",
    )
    .bind(user_id)
    .fetch_all(&mut *tx)
    .await?;

    let timers = sqlx::query_as::<_, Timer>(
        r#"
        SELECT t.* FROM medicine_timers t
        INNER JOIN medicines m ON m.id = t.medicine_id
        WHERE m.user_id = ?
        ORDER BY t.id
        "#,
    )
    .bind(user_id)
    .fetch_all(&mut *tx)
    .await?;

    tx.commit().await?;

    let mut by_medicine: HashMap<i64, Vec<Timer>> = HashMap::new();
    for timer in timers {
        by_medicine.entry(timer.medicine_id).or_default().push(timer);
    }

    for medicine in &mut medicines {
        medicine.timers = by_medicine.remove(&medicine.id).unwrap_or_default();
    }

    Ok(medicines)
}

/// Timers of one medicine, oldest first.
pub async fn list_timers<'e, E>(executor: E, medicine_id: i64) -> Result<Vec<Timer>>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Timer>("SELECT * FROM medicine_timers WHERE medicine_id = ? ORDER BY id")
        .bind(medicine_id)
        .fetch_all(executor)
        .await
        .map_err(Error::Database)
}
