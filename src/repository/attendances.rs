//! Attendances repository for database operations

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        attendance::{
            Attendance, AttendanceDetails, AttendanceFilter, NewAttendance, SavedAttendance,
        },
        AttendanceStatus,
    },
};

const DETAILS_SELECT: &str = r#"
    SELECT a.*,
           c.first_name || ' ' || c.last_name AS customer_name,
           g.name AS group_name
    FROM attendances a
    JOIN customers c ON c.id = a.customer_id
    JOIN class_groups g ON g.id = a.group_id
"#;

#[derive(Clone)]
pub struct AttendancesRepository {
    pool: Pool<Postgres>,
}

impl AttendancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get an attendance record with customer and group names
    pub async fn get_details(&self, id: i32) -> AppResult<AttendanceDetails> {
        let query = format!("{} WHERE a.id = $1", DETAILS_SELECT);
        sqlx::query_as::<_, AttendanceDetails>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Attendance record {} not found", id)))
    }

    /// List attendance records, newest first
    pub async fn list(&self, filter: &AttendanceFilter) -> AppResult<Vec<AttendanceDetails>> {
        let mut conditions = Vec::new();
        let mut idx = 1;

        if filter.group_id.is_some() {
            conditions.push(format!("a.group_id = ${}", idx));
            idx += 1;
        }
        if filter.customer_id.is_some() {
            conditions.push(format!("a.customer_id = ${}", idx));
            idx += 1;
        }
        if filter.from.is_some() {
            conditions.push(format!("a.date >= ${}", idx));
            idx += 1;
        }
        if filter.until.is_some() {
            conditions.push(format!("a.date < ${}", idx));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "{} {} ORDER BY a.date DESC, c.last_name, c.first_name",
            DETAILS_SELECT, where_clause
        );

        let mut builder = sqlx::query_as::<_, AttendanceDetails>(&query);
        if let Some(group_id) = filter.group_id { builder = builder.bind(group_id); }
        if let Some(customer_id) = filter.customer_id { builder = builder.bind(customer_id); }
        if let Some(from) = filter.from { builder = builder.bind(from); }
        if let Some(until) = filter.until { builder = builder.bind(until); }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Insert a record, or update the status of the existing record for the
    /// same (customer, group, date). Single statement, so concurrent
    /// submissions cannot create duplicates.
    pub async fn upsert(&self, data: &NewAttendance) -> AppResult<SavedAttendance> {
        let row = sqlx::query_as::<_, SavedAttendance>(
            r#"
            INSERT INTO attendances (customer_id, group_id, date, status)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (customer_id, group_id, date)
            DO UPDATE SET status = EXCLUDED.status, updated_at = NOW()
            RETURNING *, (xmax = 0) AS created
            "#,
        )
        .bind(data.customer_id)
        .bind(data.group_id)
        .bind(data.date)
        .bind(data.status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::on_constraint(
                e,
                format!(
                    "Customer {} or group {} does not exist",
                    data.customer_id, data.group_id
                ),
            )
        })?;
        Ok(row)
    }

    /// Change the status of a record
    pub async fn update_status(&self, id: i32, status: AttendanceStatus) -> AppResult<Attendance> {
        sqlx::query_as::<_, Attendance>(
            r#"
            UPDATE attendances SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Attendance record {} not found", id)))
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM attendances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Attendance record {} not found", id)));
        }
        Ok(())
    }

    /// PRESENT records of one customer dated within `[from, to]`
    pub async fn list_present_for_customer(
        &self,
        customer_id: i32,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<Attendance>> {
        let rows = sqlx::query_as::<_, Attendance>(
            r#"
            SELECT * FROM attendances
            WHERE customer_id = $1 AND is_present AND date >= $2 AND date <= $3
            ORDER BY date
            "#,
        )
        .bind(customer_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// PRESENT records of all customers dated within `[from, to]`
    pub async fn list_present_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<Attendance>> {
        let rows = sqlx::query_as::<_, Attendance>(
            r#"
            SELECT * FROM attendances
            WHERE is_present AND date >= $1 AND date <= $2
            ORDER BY customer_id, date
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
