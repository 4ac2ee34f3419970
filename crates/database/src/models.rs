//! Database models.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracker_core::{day, Member, Outcome, ScheduledItem};

/// A task scheduled for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Auto-incrementing ID.
    pub id: i64,
    /// What users have to do.
    pub description: String,
    /// Local date-time the task is scheduled for.
    pub scheduled_date: NaiveDateTime,
    /// Creation timestamp.
    pub created_at: NaiveDateTime,
}

impl ScheduledItem for Task {
    fn id(&self) -> i64 {
        self.id
    }

    fn scheduled_day(&self) -> NaiveDate {
        day::normalize(self.scheduled_date)
    }
}

/// A user registered by the bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Telegram user ID.
    pub telegram_id: String,
    /// Telegram username, if the user has one.
    pub username: Option<String>,
    /// Display name
    pub name: String,
    /// When the user joined.
    pub joined_at: NaiveDateTime,
    /// Streak as last recorded by the bot.
    pub current_streak: i64,
}

impl From<&User> for Member {
    fn from(user: &User) -> Self {
        Member {
            id: user.id,
            name: user.name.clone(),
            telegram_id: user.telegram_id.clone(),
            joined_at: user.joined_at,
        }
    }
}

/// Fields needed to register a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub telegram_id: String,
    pub username: Option<String>,
    pub name: String,
    pub joined_at: NaiveDateTime,
}

/// One user's outcome for one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TaskCompletion {
    /// Auto-incrementing ID.
    pub id: i64,
    pub user_id: i64,
    pub task_id: i64,
    /// Whether the user finished the task.
    pub completed: bool,
    /// Whether the fine for an incomplete task has been paid.
    pub penalty_paid: bool,
    /// When the fine became applicable, if it has.
    pub penalty_applied_at: Option<NaiveDateTime>,
}

impl From<&TaskCompletion> for Outcome {
    fn from(completion: &TaskCompletion) -> Self {
        Outcome {
            completed: completion.completed,
            penalty_paid: completion.penalty_paid,
            penalty_applied: completion.penalty_applied_at.is_some(),
        }
    }
}

/// A completion together with the task it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionWithTask {
    #[serde(flatten)]
    pub completion: TaskCompletion,
    pub task: Task,
}

/// A user with all of their completions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserWithTasks {
    #[serde(flatten)]
    pub user: User,
    pub tasks: Vec<CompletionWithTask>,
}
