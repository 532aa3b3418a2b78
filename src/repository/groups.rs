//! Groups repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::group::{Group, GroupFields},
};

#[derive(Clone)]
pub struct GroupsRepository {
    pool: Pool<Postgres>,
}

impl GroupsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all groups ordered by name
    pub async fn list(&self) -> AppResult<Vec<Group>> {
        let rows = sqlx::query_as::<_, Group>("SELECT * FROM class_groups ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Get group by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Group> {
        sqlx::query_as::<_, Group>("SELECT * FROM class_groups WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Group {} not found", id)))
    }

    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM class_groups WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// Create a group
    pub async fn create(&self, data: &GroupFields) -> AppResult<Group> {
        let row = sqlx::query_as::<_, Group>(
            r#"
            INSERT INTO class_groups (name, description, weekdays, start_time, end_time, price, is_permanent)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(&data.weekdays)
        .bind(data.start_time)
        .bind(data.end_time)
        .bind(data.price)
        .bind(data.is_permanent)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Replace all editable fields of a group
    pub async fn update(&self, id: i32, data: &GroupFields) -> AppResult<Group> {
        sqlx::query_as::<_, Group>(
            r#"
            UPDATE class_groups
            SET name = $2, description = $3, weekdays = $4, start_time = $5,
                end_time = $6, price = $7, is_permanent = $8, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(&data.weekdays)
        .bind(data.start_time)
        .bind(data.end_time)
        .bind(data.price)
        .bind(data.is_permanent)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Group {} not found", id)))
    }

    /// Delete a group. Fails with `Conflict` while customers or attendance
    /// rows still reference it.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM class_groups WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::on_constraint(
                    e,
                    format!("Group {} still has customers or attendance records", id),
                )
            })?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Group {} not found", id)));
        }
        Ok(())
    }
}
