//! User routes.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use database::UserWithTasks;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::routes::tasks::SuccessResponse;
use crate::state::AppState;

/// Request to set the payment flag on a user's outstanding fines.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkPaymentRequest {
    pub penalty_paid: bool,
}

/// Result of marking payments.
#[derive(Debug, Serialize)]
pub struct MarkPaymentResponse {
    pub success: bool,
    /// Number of completion rows changed.
    pub updated: u64,
}

/// List all users with their completions.
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserWithTasks>>> {
    let users = database::user::list_users_with_tasks(state.db.pool()).await?;
    Ok(Json(users))
}

/// Delete a user and their completions.
pub async fn delete_user(
    State(state): State<AppState>,
    path: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<SuccessResponse>> {
    let Path(id) = path?;
    database::user::delete_user(state.db.pool(), id).await?;
    info!(user_id = id, "User deleted");

    Ok(Json(SuccessResponse { success: true }))
}

/// Set the payment flag on every outstanding fine of a user.
pub async fn mark_payment(
    State(state): State<AppState>,
    path: std::result::Result<Path<i64>, PathRejection>,
    payload: std::result::Result<Json<MarkPaymentRequest>, JsonRejection>,
) -> Result<Json<MarkPaymentResponse>> {
    let Path(id) = path?;
    let Json(req) = payload?;
    let pool = state.db.pool();
    database::user::get_user(pool, id).await?;

    let updated = database::completion::mark_payment(pool, id, req.penalty_paid).await?;
    info!(user_id = id, paid = req.penalty_paid, updated, "Payments marked");

    Ok(Json(MarkPaymentResponse {
        success: true,
        updated,
    }))
}
