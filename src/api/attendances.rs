//! Attendance endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::attendance::{
        Attendance, AttendanceDetails, AttendanceInput, AttendanceQuery, BatchAttendanceResponse,
        UpdateAttendance,
    },
};

use super::{AppJson, AuthenticatedUser};

/// List attendance records
#[utoipa::path(
    get,
    path = "/attendances",
    tag = "attendances",
    security(("bearer_auth" = [])),
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Attendance records, newest first", body = Vec<AttendanceDetails>),
        (status = 400, description = "Invalid filter", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_attendances(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<AttendanceQuery>,
) -> AppResult<Json<Vec<AttendanceDetails>>> {
    let records = state.services.attendances.list(&query).await?;
    Ok(Json(records))
}

/// Save a batch of attendance records.
///
/// A record for an existing (customer, group, date) updates that record.
/// Returns 207 when some records failed.
#[utoipa::path(
    post,
    path = "/attendances",
    tag = "attendances",
    security(("bearer_auth" = [])),
    request_body = Vec<AttendanceInput>,
    responses(
        (status = 200, description = "All records saved", body = BatchAttendanceResponse),
        (status = 207, description = "Some records failed", body = BatchAttendanceResponse)
    )
)]
pub async fn save_attendances(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    AppJson(records): AppJson<Vec<AttendanceInput>>,
) -> (StatusCode, Json<BatchAttendanceResponse>) {
    let response = state.services.attendances.batch_upsert(records).await;
    let status = if response.failed.is_empty() {
        StatusCode::OK
    } else {
        StatusCode::MULTI_STATUS
    };
    (status, Json(response))
}

/// Get an attendance record
#[utoipa::path(
    get,
    path = "/attendances/{id}",
    tag = "attendances",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Attendance ID")),
    responses(
        (status = 200, description = "Attendance record", body = AttendanceDetails),
        (status = 404, description = "Record not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_attendance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<AttendanceDetails>> {
    let record = state.services.attendances.get(id).await?;
    Ok(Json(record))
}

/// Change the status of an attendance record
#[utoipa::path(
    patch,
    path = "/attendances/{id}",
    tag = "attendances",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Attendance ID")),
    request_body = UpdateAttendance,
    responses(
        (status = 200, description = "Record updated", body = Attendance),
        (status = 400, description = "No status given", body = crate::error::ErrorResponse),
        (status = 404, description = "Record not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_attendance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
    AppJson(data): AppJson<UpdateAttendance>,
) -> AppResult<Json<Attendance>> {
    let record = state.services.attendances.update(id, data).await?;
    Ok(Json(record))
}

/// Delete an attendance record
#[utoipa::path(
    delete,
    path = "/attendances/{id}",
    tag = "attendances",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Attendance ID")),
    responses(
        (status = 204, description = "Record deleted"),
        (status = 404, description = "Record not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_attendance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.attendances.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
