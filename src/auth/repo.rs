use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::User;
use crate::error::{is_unique_violation, ApiError};

impl User {
    /// Find an account by (already normalized) email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new account with a hashed password. The unique constraint on
    /// email is the source of truth; its violation surfaces as DuplicateEmail.
    pub async fn create(
        db: &PgPool,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<User, ApiError> {
        let res = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, username, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, username, password_hash, created_at
            "#,
        )
        .bind(email)
        .bind(username)
        .bind(password_hash)
        .fetch_one(db)
        .await;

        match res {
            Ok(user) => Ok(user),
            Err(e) if is_unique_violation(&e) => Err(ApiError::DuplicateEmail),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete an account; saved_events rows cascade at the schema level.
    pub async fn delete(db: &PgPool, id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("account"));
        }
        Ok(())
    }
}
