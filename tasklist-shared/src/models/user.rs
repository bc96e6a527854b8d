/// User model and database operations
///
/// Users are created implicitly the first time a validated token presents an
/// email we have not seen. They are never deleted by this service.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email TEXT NOT NULL UNIQUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use tasklist_shared::models::user::User;
/// use tasklist_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let first = User::upsert_by_email(&pool, "user@example.com").await?;
/// let second = User::upsert_by_email(&pool, "user@example.com").await?;
/// assert_eq!(first, second);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// User model representing a task-list owner
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4), immutable once assigned
    pub id: Uuid,

    /// Email address from the identity claim
    ///
    /// Must be unique across all users
    pub email: String,

    /// When the user was first seen
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Returns the ID of the user with `email`, creating the row if needed
    ///
    /// This is a single statement: the no-op `DO UPDATE` makes `RETURNING`
    /// yield the existing row's ID on conflict, so there is no window between
    /// insert and lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails
    pub async fn upsert_by_email(pool: &PgPool, email: &str) -> Result<Uuid, sqlx::Error> {
        let (id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO users (email)
            VALUES ($1)
            ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email
            RETURNING id
            "#,
        )
        .bind(email)
        .fetch_one(pool)
        .await?;

        Ok(id)
    }

    /// Finds a user by email address
    ///
    /// # Returns
    ///
    /// The user if found, None otherwise
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }
}
