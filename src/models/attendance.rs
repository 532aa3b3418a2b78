//! Attendance model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::enums::AttendanceStatus;
use crate::error::{AppError, AppResult};

/// One customer's attendance of one group on one date
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: i32,
    pub customer_id: i32,
    pub group_id: i32,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    /// Derived from `status` (generated column)
    pub is_present: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Attendance with customer and group names, as shown in listings
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceDetails {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub attendance: Attendance,
    pub customer_name: String,
    pub group_name: String,
}

/// Result row of an upsert
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavedAttendance {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub attendance: Attendance,
    /// `true` when a new row was inserted, `false` when an existing one was updated
    pub created: bool,
}

/// One record of a batch attendance submission
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceInput {
    pub customer_id: i32,
    pub group_id: i32,
    /// Class date (YYYY-MM-DD)
    #[serde(deserialize_with = "super::iso_date::deserialize")]
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    pub status: Option<AttendanceStatus>,
    /// Accepted for older clients when `status` is absent
    pub is_present: Option<bool>,
}

impl AttendanceInput {
    pub fn resolved_status(&self) -> AppResult<AttendanceStatus> {
        resolve_status(self.status, self.is_present)
    }
}

/// Update attendance request
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttendance {
    pub status: Option<AttendanceStatus>,
    pub is_present: Option<bool>,
}

impl UpdateAttendance {
    pub fn resolved_status(&self) -> AppResult<AttendanceStatus> {
        resolve_status(self.status, self.is_present)
    }
}

/// `status` wins; a bare presence flag maps to PRESENT / ABSENT
fn resolve_status(
    status: Option<AttendanceStatus>,
    is_present: Option<bool>,
) -> AppResult<AttendanceStatus> {
    status
        .or_else(|| is_present.map(AttendanceStatus::from))
        .ok_or_else(|| AppError::Validation("Either status or isPresent is required".to_string()))
}

/// Attendance record to be inserted or updated
#[derive(Debug, Clone, PartialEq)]
pub struct NewAttendance {
    pub customer_id: i32,
    pub group_id: i32,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

/// Failed record of a batch submission
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchFailure {
    /// Position of the record in the submitted array
    pub index: usize,
    pub customer_id: i32,
    pub group_id: i32,
    pub error: String,
}

/// Batch submission outcome. Records are saved independently of each other.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchAttendanceResponse {
    pub saved: Vec<SavedAttendance>,
    pub failed: Vec<BatchFailure>,
}

/// Query parameters for attendance listings
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct AttendanceQuery {
    pub group_id: Option<i32>,
    pub customer_id: Option<i32>,
    /// Calendar month (1-12); only applied together with `year`
    pub month: Option<u32>,
    pub year: Option<i32>,
    /// Earliest date (YYYY-MM-DD), inclusive
    #[serde(default, deserialize_with = "super::iso_date::option::deserialize")]
    #[param(value_type = Option<String>)]
    pub from: Option<NaiveDate>,
    /// Latest date (YYYY-MM-DD), inclusive
    #[serde(default, deserialize_with = "super::iso_date::option::deserialize")]
    #[param(value_type = Option<String>)]
    pub to: Option<NaiveDate>,
}

/// Date bounds resolved from an [`AttendanceQuery`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttendanceFilter {
    pub group_id: Option<i32>,
    pub customer_id: Option<i32>,
    /// Inclusive lower bound
    pub from: Option<NaiveDate>,
    /// Exclusive upper bound
    pub until: Option<NaiveDate>,
}

impl TryFrom<&AttendanceQuery> for AttendanceFilter {
    type Error = AppError;

    fn try_from(query: &AttendanceQuery) -> Result<Self, Self::Error> {
        let mut filter = AttendanceFilter {
            group_id: query.group_id,
            customer_id: query.customer_id,
            from: query.from,
            until: query.to.and_then(|d| d.succ_opt()),
        };

        if let (Some(month), Some(year)) = (query.month, query.year) {
            let start = NaiveDate::from_ymd_opt(year, month, 1)
                .ok_or_else(|| AppError::Validation(format!("Invalid month {}/{}", month, year)))?;
            let end = if month == 12 {
                NaiveDate::from_ymd_opt(year + 1, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(year, month + 1, 1)
            }
            .ok_or_else(|| AppError::Validation(format!("Invalid month {}/{}", month, year)))?;

            filter.from = Some(filter.from.map_or(start, |f| f.max(start)));
            filter.until = Some(filter.until.map_or(end, |u| u.min(end)));
        }

        Ok(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_status_takes_precedence_over_flag() {
        let input: AttendanceInput = serde_json::from_str(
            r#"{"customerId":1,"groupId":2,"date":"2024-05-06","status":"EXCUSED","isPresent":true}"#,
        )
        .unwrap();
        assert_eq!(input.resolved_status().unwrap(), AttendanceStatus::Excused);
    }

    #[test]
    fn test_legacy_flag_only() {
        let update: UpdateAttendance = serde_json::from_str(r#"{"isPresent":false}"#).unwrap();
        assert_eq!(update.resolved_status().unwrap(), AttendanceStatus::Absent);

        let empty: UpdateAttendance = serde_json::from_str("{}").unwrap();
        assert!(empty.resolved_status().is_err());
    }

    #[test]
    fn test_month_filter_bounds() {
        let query = AttendanceQuery {
            month: Some(12),
            year: Some(2024),
            ..Default::default()
        };
        let filter = AttendanceFilter::try_from(&query).unwrap();
        assert_eq!(filter.from, Some(date(2024, 12, 1)));
        assert_eq!(filter.until, Some(date(2025, 1, 1)));
    }

    #[test]
    fn test_month_without_year_is_ignored() {
        let query = AttendanceQuery {
            month: Some(3),
            ..Default::default()
        };
        assert_eq!(AttendanceFilter::try_from(&query).unwrap(), AttendanceFilter::default());
    }

    #[test]
    fn test_invalid_month_rejected() {
        let query = AttendanceQuery {
            month: Some(13),
            year: Some(2024),
            ..Default::default()
        };
        assert!(AttendanceFilter::try_from(&query).is_err());
    }

    #[test]
    fn test_window_intersects_month() {
        let query = AttendanceQuery {
            month: Some(2),
            year: Some(2024),
            from: Some(date(2024, 2, 10)),
            to: Some(date(2024, 3, 15)),
            ..Default::default()
        };
        let filter = AttendanceFilter::try_from(&query).unwrap();
        assert_eq!(filter.from, Some(date(2024, 2, 10)));
        assert_eq!(filter.until, Some(date(2024, 3, 1)));
    }
}
