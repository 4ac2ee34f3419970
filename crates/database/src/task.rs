//! Task CRUD operations.
//!
//! Every write stores the normalized `scheduled_day` next to the full date-time.
//! The unique index on that column is what finally guarantees one task per
//! day; a violation surfaces as [`DatabaseError::AlreadyExists`].

use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use sqlx::SqlitePool;
use tracker_core::day;

use crate::error::{DatabaseError, Result};
use crate::models::Task;

/// Create a new task.
pub async fn create_task(
    pool: &SqlitePool,
    description: &str,
    scheduled_date: NaiveDateTime,
) -> Result<Task> {
    let scheduled_day = day::normalize(scheduled_date);
    let created_at = Local::now().naive_local();

    let result = sqlx::query(
        r#"
        INSERT INTO tasks (description, scheduled_date, scheduled_day, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(description)
    .bind(scheduled_date)
    .bind(scheduled_day)
    .bind(created_at)
    .execute(pool)
    .await
    .map_err(|e| DatabaseError::from_insert(e, "Task", scheduled_day))?;

    tracing::debug!(task_id = result.last_insert_rowid(), %scheduled_day, "Task created");

    Ok(Task {
        id: result.last_insert_rowid(),
        description: description.to_string(),
        scheduled_date,
        created_at,
    })
}

/// Get a task by ID.
pub async fn get_task(pool: &SqlitePool, id: i64) -> Result<Task> {
    sqlx::query_as::<_, Task>(
        r#"
        SELECT id, description, scheduled_date, created_at
        FROM tasks
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Task",
        id: id.to_string(),
    })
}

/// Update a task's description and date.
pub async fn update_task(
    pool: &SqlitePool,
    id: i64,
    description: &str,
    scheduled_date: NaiveDateTime,
) -> Result<Task> {
    let scheduled_day = day::normalize(scheduled_date);

    let result = sqlx::query(
        r#"
        UPDATE tasks
        SET description = ?, scheduled_date = ?, scheduled_day = ?
        WHERE id = ?
        "#,
    )
    .bind(description)
    .bind(scheduled_date)
    .bind(scheduled_day)
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| DatabaseError::from_insert(e, "Task", scheduled_day))?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Task",
            id: id.to_string(),
        });
    }

    get_task(pool, id).await
}

/// Delete a task by ID, along with its completions.
pub async fn delete_task(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM tasks
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Task",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// List all tasks, latest scheduled first.
pub async fn list_tasks(pool: &SqlitePool) -> Result<Vec<Task>> {
    let tasks = sqlx::query_as::<_, Task>(
        r#"
        SELECT id, description, scheduled_date, created_at
        FROM tasks
        ORDER BY scheduled_date DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(tasks)
}

/// List all tasks in schedule order, oldest first.
pub async fn list_tasks_chronological(pool: &SqlitePool) -> Result<Vec<Task>> {
    let tasks = sqlx::query_as::<_, Task>(
        r#"
        SELECT id, description, scheduled_date, created_at
        FROM tasks
        ORDER BY scheduled_date ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(tasks)
}

/// Find tasks scheduled within `[day, day + 1)`.
pub async fn tasks_on_day(pool: &SqlitePool, date: NaiveDate) -> Result<Vec<Task>> {
    let start = day::start_of(date);
    let end = start + Duration::days(1);

    let tasks = sqlx::query_as::<_, Task>(
        r#"
        SELECT id, description, scheduled_date, created_at
        FROM tasks
        WHERE scheduled_date >= ? AND scheduled_date < ?
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    Ok(tasks)
}

/// Count total tasks.
pub async fn count_tasks(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM tasks
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Count tasks scheduled after `today`.
pub async fn count_upcoming_tasks(pool: &SqlitePool, today: NaiveDate) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM tasks
        WHERE scheduled_day > ?
        "#,
    )
    .bind(today)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
