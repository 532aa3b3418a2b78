//! Customers repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::customer::{Customer, CustomerFields, CustomerShort},
};

#[derive(Clone)]
pub struct CustomersRepository {
    pool: Pool<Postgres>,
}

impl CustomersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all customers ordered by name
    pub async fn list(&self) -> AppResult<Vec<Customer>> {
        let rows = sqlx::query_as::<_, Customer>(
            "SELECT * FROM customers ORDER BY last_name, first_name, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Short form of every customer that belongs to a group
    pub async fn list_short_with_group(&self) -> AppResult<Vec<CustomerShort>> {
        let rows = sqlx::query_as::<_, CustomerShort>(
            r#"
            SELECT id, first_name, last_name, phone_number, group_id
            FROM customers
            WHERE group_id IS NOT NULL
            ORDER BY last_name, first_name, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Members of a single group
    pub async fn list_by_group(&self, group_id: i32) -> AppResult<Vec<CustomerShort>> {
        let rows = sqlx::query_as::<_, CustomerShort>(
            r#"
            SELECT id, first_name, last_name, phone_number, group_id
            FROM customers
            WHERE group_id = $1
            ORDER BY last_name, first_name, id
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Get customer by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Customer> {
        sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Customer {} not found", id)))
    }

    /// Create a customer; the billing window starts at creation time
    pub async fn create(&self, data: &CustomerFields) -> AppResult<Customer> {
        let row = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (first_name, last_name, phone_number, email, date_of_birth, group_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.phone_number)
        .bind(&data.email)
        .bind(data.date_of_birth)
        .bind(data.group_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::on_constraint(e, missing_group(data)))?;
        Ok(row)
    }

    /// Replace all editable fields of a customer. `last_payment_date` is not
    /// editable here.
    pub async fn update(&self, id: i32, data: &CustomerFields) -> AppResult<Customer> {
        sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers
            SET first_name = $2, last_name = $3, phone_number = $4, email = $5,
                date_of_birth = $6, group_id = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.phone_number)
        .bind(&data.email)
        .bind(data.date_of_birth)
        .bind(data.group_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::on_constraint(e, missing_group(data)))?
        .ok_or_else(|| AppError::NotFound(format!("Customer {} not found", id)))
    }

    /// Move the billing window start to `paid_at`. Never moves it backwards.
    pub async fn record_payment(&self, id: i32, paid_at: DateTime<Utc>) -> AppResult<Customer> {
        sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers
            SET last_payment_date = GREATEST(last_payment_date, $2), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(paid_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Customer {} not found", id)))
    }

    /// Delete a customer together with their attendance rows
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Customer {} not found", id)));
        }
        Ok(())
    }
}

fn missing_group(data: &CustomerFields) -> String {
    match data.group_id {
        Some(group_id) => format!("Group {} does not exist", group_id),
        None => "Group does not exist".to_string(),
    }
}
