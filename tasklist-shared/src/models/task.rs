/// Task model and database operations
///
/// A task is a single to-do item owned by exactly one user. Every statement in
/// this module takes the owner's ID and filters on it, so a caller can never
/// read or mutate another user's rows.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     text TEXT NOT NULL,
///     done BOOLEAN NOT NULL DEFAULT FALSE,
///     owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Wire Format
///
/// Tasks serialize as `{"id": 1, "task": "buy milk", "status": false}`.
/// The owner ID is never exposed.
///
/// # Example
///
/// ```no_run
/// use tasklist_shared::models::task::{CreateTask, Task};
/// use tasklist_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example(owner: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, owner, CreateTask {
///     text: "buy milk".to_string(),
///     done: None,
/// }).await?;
///
/// let toggled = Task::toggle_done(&pool, owner, task.id).await?;
/// assert_eq!(toggled.map(|t| t.done), Some(true));
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A single to-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Database-assigned ID (positive, increasing)
    pub id: i64,

    /// Task description
    #[serde(rename = "task")]
    pub text: String,

    /// Completion flag
    #[serde(rename = "status")]
    pub done: bool,

    /// Owning user
    #[serde(skip)]
    pub owner_id: Uuid,
}

/// Input for creating a task
///
/// Deserializes from the add-task request body `{"task": "...", "status": true}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Task description
    #[serde(rename = "task")]
    pub text: String,

    /// Initial completion flag, defaults to false
    #[serde(rename = "status", default)]
    pub done: Option<bool>,
}

/// Input for editing a task's text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTask {
    /// Replacement description
    #[serde(rename = "task")]
    pub text: String,
}

impl Task {
    /// Lists every task owned by `owner_id` in insertion order
    ///
    /// Returns an empty vector when the user has no tasks.
    pub async fn list_by_owner(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, text, done, owner_id
            FROM tasks
            WHERE owner_id = $1
            ORDER BY id
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Inserts a new task for `owner_id`
    ///
    /// # Returns
    ///
    /// The stored task including its assigned ID
    pub async fn create(
        pool: &PgPool,
        owner_id: Uuid,
        data: CreateTask,
    ) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (text, done, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, text, done, owner_id
            "#,
        )
        .bind(data.text)
        .bind(data.done.unwrap_or(false))
        .bind(owner_id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Deletes a task if it belongs to `owner_id`
    ///
    /// # Returns
    ///
    /// True if a row was deleted, false if the ID is unknown or owned by someone else
    pub async fn delete(pool: &PgPool, owner_id: Uuid, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Replaces the text of a task owned by `owner_id`
    ///
    /// # Returns
    ///
    /// The updated task, or None if no owned task has this ID
    pub async fn update_text(
        pool: &PgPool,
        owner_id: Uuid,
        id: i64,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET text = $3
            WHERE id = $1 AND owner_id = $2
            RETURNING id, text, done, owner_id
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(data.text)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Flips the completion flag of a task owned by `owner_id`
    ///
    /// The negation happens inside a single UPDATE, so two concurrent toggles
    /// serialize on the row lock and both take effect.
    ///
    /// # Returns
    ///
    /// The updated task, or None if no owned task has this ID
    pub async fn toggle_done(
        pool: &PgPool,
        owner_id: Uuid,
        id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET done = NOT done
            WHERE id = $1 AND owner_id = $2
            RETURNING id, text, done, owner_id
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }
}
