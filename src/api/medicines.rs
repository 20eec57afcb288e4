//! Medicine Routes
//!
//! Routes (token-protected):
//! - POST /medicines - Create a medicine with its timers
//! - GET /medicines - List the caller's medicines
//! - GET /medicines/:id - Get one medicine
//! - PUT /medicines/:id - Replace a medicine and its timers
//! - DELETE /medicines/:id - Delete a medicine
//!
//! All operations answer HTTP 200 with a status envelope.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Extension, Json, Router,
};

use super::envelope::{Envelope, OpResult};
use crate::middleware::AuthContext;
use crate::models::{Medicine, MedicineId, MedicineInput};
use crate::AppState;

/// Build medicine routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_medicines).post(create_medicine))
        .route(
            "/:id",
            get(get_medicine).put(update_medicine).delete(delete_medicine),
        )
}

// ============================================================================
// Handlers
// ============================================================================

/// Create a medicine.
///
/// POST /medicines
async fn create_medicine(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    body: Result<Json<MedicineInput>, JsonRejection>,
) -> OpResult {
    let Json(input) = body?;
    let id = state.medicines.create(&input, &auth.user_id).await?;
    Ok(Envelope::message("Medicine added successfully").with_id(id))
}

/// List the caller's medicines.
///
/// GET /medicines
async fn list_medicines(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> OpResult<Vec<Medicine>> {
    let medicines = state.medicines.list(&auth.user_id).await?;
    Ok(Envelope::rows(medicines))
}

/// Get one medicine with its timers.
///
/// GET /medicines/:id
async fn get_medicine(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> OpResult<Medicine> {
    let id = MedicineId::parse(&id)?;
    let medicine = state.medicines.get(id, &auth.user_id).await?;
    Ok(Envelope::rows(medicine))
}

/// Replace a medicine and its full timer set.
///
/// PUT /medicines/:id
async fn update_medicine(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    body: Result<Json<MedicineInput>, JsonRejection>,
) -> OpResult {
    let id = MedicineId::parse(&id)?;
    let Json(input) = body?;
    state.medicines.update(id, &input, &auth.user_id).await?;
    Ok(Envelope::message("Medicine updated successfully"))
}

/// Delete a medicine.
///
/// DELETE /medicines/:id
async fn delete_medicine(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> OpResult {
    let id = MedicineId::parse(&id)?;
    state.medicines.delete(id, &auth.user_id).await?;
    Ok(Envelope::message("Medicine deleted successfully"))
}
