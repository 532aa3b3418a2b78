//! Users repository for database operations

use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::user::User};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by username (case-insensitive)
    pub async fn get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE LOWER(username) = LOWER($1)",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Create the user, or leave an existing one untouched unless
    /// `reset_password` is set
    pub async fn upsert(&self, username: &str, password_hash: &str, reset_password: bool) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password)
            VALUES ($1, $2)
            ON CONFLICT (username) DO UPDATE
            SET password = CASE WHEN $3 THEN EXCLUDED.password ELSE users.password END
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(reset_password)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }
}
