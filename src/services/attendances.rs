//! Attendance service

use crate::{
    error::AppResult,
    models::attendance::{
        Attendance, AttendanceDetails, AttendanceFilter, AttendanceInput, AttendanceQuery,
        BatchAttendanceResponse, BatchFailure, NewAttendance, SavedAttendance, UpdateAttendance,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct AttendancesService {
    repository: Repository,
}

impl AttendancesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: &AttendanceQuery) -> AppResult<Vec<AttendanceDetails>> {
        let filter = AttendanceFilter::try_from(query)?;
        self.repository.attendances.list(&filter).await
    }

    pub async fn get(&self, id: i32) -> AppResult<AttendanceDetails> {
        self.repository.attendances.get_details(id).await
    }

    pub async fn update(&self, id: i32, data: UpdateAttendance) -> AppResult<Attendance> {
        let status = data.resolved_status()?;
        let attendance = self.repository.attendances.update_status(id, status).await?;
        tracing::info!("Attendance {} set to {}", id, status);
        Ok(attendance)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.attendances.delete(id).await
    }

    /// Save every record independently. A failing record is reported and does
    /// not affect its siblings.
    pub async fn batch_upsert(&self, records: Vec<AttendanceInput>) -> BatchAttendanceResponse {
        let mut response = BatchAttendanceResponse::default();

        for (index, record) in records.into_iter().enumerate() {
            match self.save_one(&record).await {
                Ok(saved) => response.saved.push(saved),
                Err(e) => {
                    tracing::warn!(
                        "Attendance record {} (customer {}, group {}, {}) rejected: {}",
                        index,
                        record.customer_id,
                        record.group_id,
                        record.date,
                        e
                    );
                    response.failed.push(BatchFailure {
                        index,
                        customer_id: record.customer_id,
                        group_id: record.group_id,
                        error: e.public_message(),
                    });
                }
            }
        }

        let created = response.saved.iter().filter(|s| s.created).count();
        tracing::info!(
            "Attendance batch: {} created, {} updated, {} failed",
            created,
            response.saved.len() - created,
            response.failed.len()
        );
        response
    }

    async fn save_one(&self, record: &AttendanceInput) -> AppResult<SavedAttendance> {
        let data = NewAttendance {
            customer_id: record.customer_id,
            group_id: record.group_id,
            date: record.date,
            status: record.resolved_status()?,
        };
        self.repository.attendances.upsert(&data).await
    }
}
