//! Task completion records and penalty payments.

use chrono::NaiveDateTime;
use sqlx::{FromRow, SqlitePool};
use tracker_core::FinePolicy;

use crate::error::{DatabaseError, Result};
use crate::models::{CompletionWithTask, Task, TaskCompletion};

/// Record a user's outcome for a task.
pub async fn create_completion(
    pool: &SqlitePool,
    user_id: i64,
    task_id: i64,
    completed: bool,
) -> Result<TaskCompletion> {
    let result = sqlx::query(
        r#"
        INSERT INTO task_completions (user_id, task_id, completed)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(task_id)
    .bind(completed)
    .execute(pool)
    .await
    .map_err(|e| DatabaseError::from_insert(e, "TaskCompletion", format!("{user_id}/{task_id}")))?;

    Ok(TaskCompletion {
        id: result.last_insert_rowid(),
        user_id,
        task_id,
        completed,
        penalty_paid: false,
        penalty_applied_at: None,
    })
}

/// Mark the fine on an incomplete completion as applicable from `at`.
pub async fn apply_penalty(pool: &SqlitePool, completion_id: i64, at: NaiveDateTime) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE task_completions
        SET penalty_applied_at = ?
        WHERE id = ? AND completed = 0
        "#,
    )
    .bind(at)
    .bind(completion_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "TaskCompletion",
            id: completion_id.to_string(),
        });
    }

    Ok(())
}

/// Set the payment flag on every outstanding fine of a user.
///
/// Only rows that are incomplete and still unpaid are touched, so this never
/// un-pays a row and ignores completed tasks. Returns the number of rows whose
/// flag changed, which is always zero for `paid = false`; zero is not an error.
pub async fn mark_payment(pool: &SqlitePool, user_id: i64, paid: bool) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE task_completions
        SET penalty_paid = ?
        WHERE user_id = ? AND completed = 0 AND penalty_paid = 0 AND penalty_paid <> ?
        "#,
    )
    .bind(paid)
    .bind(user_id)
    .bind(paid)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// List all completions.
pub async fn list_completions(pool: &SqlitePool) -> Result<Vec<TaskCompletion>> {
    let rows = sqlx::query_as::<_, TaskCompletion>(
        r#"
        SELECT id, user_id, task_id, completed, penalty_paid, penalty_applied_at
        FROM task_completions
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// List the completions of one user.
pub async fn list_user_completions(pool: &SqlitePool, user_id: i64) -> Result<Vec<TaskCompletion>> {
    let rows = sqlx::query_as::<_, TaskCompletion>(
        r#"
        SELECT id, user_id, task_id, completed, penalty_paid, penalty_applied_at
        FROM task_completions
        WHERE user_id = ?
        ORDER BY id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

#[derive(FromRow)]
struct CompletionTaskRow {
    id: i64,
    user_id: i64,
    task_id: i64,
    completed: bool,
    penalty_paid: bool,
    penalty_applied_at: Option<NaiveDateTime>,
    description: String,
    scheduled_date: NaiveDateTime,
    created_at: NaiveDateTime,
}

impl From<CompletionTaskRow> for CompletionWithTask {
    fn from(row: CompletionTaskRow) -> Self {
        CompletionWithTask {
            completion: TaskCompletion {
                id: row.id,
                user_id: row.user_id,
                task_id: row.task_id,
                completed: row.completed,
                penalty_paid: row.penalty_paid,
                penalty_applied_at: row.penalty_applied_at,
            },
            task: Task {
                id: row.task_id,
                description: row.description,
                scheduled_date: row.scheduled_date,
                created_at: row.created_at,
            },
        }
    }
}

/// List all completions joined with their tasks, in schedule order.
pub async fn list_completions_with_tasks(pool: &SqlitePool) -> Result<Vec<CompletionWithTask>> {
    let rows = sqlx::query_as::<_, CompletionTaskRow>(
        r#"
        SELECT c.id, c.user_id, c.task_id, c.completed, c.penalty_paid, c.penalty_applied_at,
               t.description, t.scheduled_date, t.created_at
        FROM task_completions c
        INNER JOIN tasks t ON t.id = c.task_id
        ORDER BY t.scheduled_date, c.id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(CompletionWithTask::from).collect())
}

/// Count completions marked as done.
pub async fn count_completed(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM task_completions
        WHERE completed = 1
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Count outstanding fines under `policy`.
pub async fn count_pending_payments(pool: &SqlitePool, policy: FinePolicy) -> Result<i64> {
    let query = match policy {
        FinePolicy::Gated => {
            r#"
            SELECT COUNT(*) FROM task_completions
            WHERE completed = 0 AND penalty_paid = 0 AND penalty_applied_at IS NOT NULL
            "#
        }
        FinePolicy::Immediate => {
            r#"
            SELECT COUNT(*) FROM task_completions
            WHERE completed = 0 AND penalty_paid = 0
            "#
        }
    };

    let count = sqlx::query_scalar::<_, i64>(query).fetch_one(pool).await?;

    Ok(count)
}
