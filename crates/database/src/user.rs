//! User CRUD operations.

use std::collections::HashMap;

use sqlx::SqlitePool;

use crate::completion;
use crate::error::{DatabaseError, Result};
use crate::models::{NewUser, User, UserWithTasks};

/// Register a new user.
///
/// Users normally arrive through the bot; the admin surface only reads and
/// deletes them.
pub async fn create_user(pool: &SqlitePool, user: &NewUser) -> Result<User> {
    let result = sqlx::query(
        r#"
        INSERT INTO users (telegram_id, username, name, joined_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&user.telegram_id)
    .bind(&user.username)
    .bind(&user.name)
    .bind(user.joined_at)
    .execute(pool)
    .await
    .map_err(|e| DatabaseError::from_insert(e, "User", &user.telegram_id))?;

    Ok(User {
        id: result.last_insert_rowid(),
        telegram_id: user.telegram_id.clone(),
        username: user.username.clone(),
        name: user.name.clone(),
        joined_at: user.joined_at,
        current_streak: 0,
    })
}

/// Get a user by ID.
pub async fn get_user(pool: &SqlitePool, id: i64) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, telegram_id, username, name, joined_at, current_streak
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "User",
        id: id.to_string(),
    })
}

/// Delete a user by ID. Their completions go with them.
pub async fn delete_user(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "User",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// List all users.
pub async fn list_users(pool: &SqlitePool) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, telegram_id, username, name, joined_at, current_streak
        FROM users
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(users)
}

/// List all users with their completions and the tasks those belong to.
pub async fn list_users_with_tasks(pool: &SqlitePool) -> Result<Vec<UserWithTasks>> {
    let users = list_users(pool).await?;
    let mut by_user: HashMap<i64, Vec<_>> = HashMap::new();
    for entry in completion::list_completions_with_tasks(pool).await? {
        by_user
            .entry(entry.completion.user_id)
            .or_default()
            .push(entry);
    }

    Ok(users
        .into_iter()
        .map(|user| {
            let tasks = by_user.remove(&user.id).unwrap_or_default();
            UserWithTasks { user, tasks }
        })
        .collect())
}

/// Count total users.
pub async fn count_users(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM users
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
