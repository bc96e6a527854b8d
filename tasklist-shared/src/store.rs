/// Storage traits used by the request handlers
///
/// Handlers talk to storage through [`Store`] rather than a concrete pool so
/// the HTTP layer can be exercised without a database. [`PgStore`] is the
/// production implementation and simply delegates to the models.
///
/// Every task operation takes the resolved owner ID. Identity is resolved once
/// per request (see [`crate::auth::identity`]) and passed down.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use tasklist_shared::store::{PgStore, Store, TaskStore, UserStore};
/// use tasklist_shared::models::task::CreateTask;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let store: Arc<dyn Store> = Arc::new(PgStore::new(pool));
///
/// let owner = store.upsert_user("user@example.com").await?;
/// store.add_task(owner, CreateTask { text: "buy milk".into(), done: None }).await?;
/// assert_eq!(store.list_tasks(owner).await?.len(), 1);
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{
    task::{CreateTask, Task, UpdateTask},
    user::User,
};

/// Maps identity claims to durable user IDs
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Returns the ID for `email`, inserting the user on first sight
    async fn upsert_user(&self, email: &str) -> Result<Uuid, sqlx::Error>;
}

/// Owner-scoped task operations
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// All tasks owned by `owner`, in insertion order
    async fn list_tasks(&self, owner: Uuid) -> Result<Vec<Task>, sqlx::Error>;

    /// Creates a task; `done` defaults to false
    async fn add_task(&self, owner: Uuid, data: CreateTask) -> Result<Task, sqlx::Error>;

    /// Deletes an owned task; false if nothing matched
    async fn delete_task(&self, owner: Uuid, id: i64) -> Result<bool, sqlx::Error>;

    /// Replaces an owned task's text; None if nothing matched
    async fn edit_task(
        &self,
        owner: Uuid,
        id: i64,
        data: UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error>;

    /// Atomically negates an owned task's `done`; None if nothing matched
    async fn toggle_task(&self, owner: Uuid, id: i64) -> Result<Option<Task>, sqlx::Error>;
}

/// Everything a request handler needs from storage
#[async_trait]
pub trait Store: UserStore + TaskStore {
    /// Verifies the backing database answers
    async fn health_check(&self) -> Result<(), sqlx::Error>;
}

/// PostgreSQL-backed store
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wraps an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), sqlx::Error> {
        crate::db::pool::health_check(&self.pool).await
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn upsert_user(&self, email: &str) -> Result<Uuid, sqlx::Error> {
        User::upsert_by_email(&self.pool, email).await
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn list_tasks(&self, owner: Uuid) -> Result<Vec<Task>, sqlx::Error> {
        Task::list_by_owner(&self.pool, owner).await
    }

    async fn add_task(&self, owner: Uuid, data: CreateTask) -> Result<Task, sqlx::Error> {
        Task::create(&self.pool, owner, data).await
    }

    async fn delete_task(&self, owner: Uuid, id: i64) -> Result<bool, sqlx::Error> {
        Task::delete(&self.pool, owner, id).await
    }

    async fn edit_task(
        &self,
        owner: Uuid,
        id: i64,
        data: UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        Task::update_text(&self.pool, owner, id, data).await
    }

    async fn toggle_task(&self, owner: Uuid, id: i64) -> Result<Option<Task>, sqlx::Error> {
        Task::toggle_done(&self.pool, owner, id).await
    }
}
