/// Database models for the task list
///
/// # Models
///
/// - `user`: Task-list owners, keyed by email
/// - `task`: Owner-scoped to-do items
///
/// # Example
///
/// ```no_run
/// use tasklist_shared::models::{task::Task, user::User};
/// use tasklist_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let owner = User::upsert_by_email(&pool, "user@example.com").await?;
/// let tasks = Task::list_by_owner(&pool, owner).await?;
/// # Ok(())
/// # }
/// ```

pub mod task;
pub mod user;
