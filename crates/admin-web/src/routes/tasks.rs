//! Task routes.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use chrono::NaiveDateTime;
use database::Task;
use serde::{Deserialize, Serialize};
use tracing::info;
use tracker_core::{day, schedule, ScheduleRejection};

use crate::error::Result;
use crate::state::AppState;

/// Request to create or edit a task.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    pub description: String,
    pub scheduled_date: String,
}

impl TaskRequest {
    /// Check the fields and parse the date.
    fn parse(&self) -> std::result::Result<(&str, NaiveDateTime), ScheduleRejection> {
        schedule::validate_description(&self.description)?;
        let scheduled_date =
            day::parse_date_time(&self.scheduled_date).ok_or(ScheduleRejection::InvalidDate)?;
        Ok((self.description.trim(), scheduled_date))
    }
}

/// Generic success response.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// List all tasks, latest first.
pub async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<Task>>> {
    let tasks = database::task::list_tasks(state.db.pool()).await?;
    Ok(Json(tasks))
}

/// Schedule a new task on a free future day.
pub async fn create_task(
    State(state): State<AppState>,
    payload: std::result::Result<Json<TaskRequest>, JsonRejection>,
) -> Result<Json<Task>> {
    let Json(req) = payload?;
    let pool = state.db.pool();
    let (description, scheduled_date) = req.parse()?;
    let scheduled_day = day::normalize(scheduled_date);

    let existing = database::task::tasks_on_day(pool, scheduled_day).await?;
    schedule::validate_schedule(scheduled_day, &existing, None)?;

    let task = database::task::create_task(pool, description, scheduled_date).await?;
    info!(task_id = task.id, %scheduled_day, "Task created");

    Ok(Json(task))
}

/// Edit a task. Its own current day does not count as taken.
pub async fn update_task(
    State(state): State<AppState>,
    path: std::result::Result<Path<i64>, PathRejection>,
    payload: std::result::Result<Json<TaskRequest>, JsonRejection>,
) -> Result<Json<Task>> {
    let Path(id) = path?;
    let Json(req) = payload?;
    let pool = state.db.pool();
    database::task::get_task(pool, id).await?;

    let (description, scheduled_date) = req.parse()?;
    let scheduled_day = day::normalize(scheduled_date);

    let existing = database::task::tasks_on_day(pool, scheduled_day).await?;
    schedule::validate_schedule(scheduled_day, &existing, Some(id))?;

    let task = database::task::update_task(pool, id, description, scheduled_date).await?;
    info!(task_id = task.id, %scheduled_day, "Task updated");

    Ok(Json(task))
}

/// Delete a task and its completion records.
pub async fn delete_task(
    State(state): State<AppState>,
    path: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<SuccessResponse>> {
    let Path(id) = path?;
    database::task::delete_task(state.db.pool(), id).await?;
    info!(task_id = id, "Task deleted");

    Ok(Json(SuccessResponse { success: true }))
}
