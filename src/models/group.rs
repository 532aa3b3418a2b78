//! Class group model

use chrono::{DateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::customer::CustomerShort;

/// A class group with its weekly schedule
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    /// Comma-joined weekday tokens, e.g. "MONDAY,THURSDAY" (at most two)
    pub weekdays: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Price per month
    #[schema(value_type = String, example = "4500.00")]
    pub price: Decimal,
    pub is_permanent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Group reference embedded in customer responses
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupShort {
    pub id: i32,
    pub name: String,
}

impl From<&Group> for GroupShort {
    fn from(group: &Group) -> Self {
        Self {
            id: group.id,
            name: group.name.clone(),
        }
    }
}

/// Group together with its members
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupDetails {
    #[serde(flatten)]
    pub group: Group,
    /// Localized names of the scheduled weekdays
    pub weekday_names: Vec<String>,
    pub customers: Vec<CustomerShort>,
}

/// Create group request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroup {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    pub description: Option<String>,
    /// Comma-joined weekday tokens (MONDAY..SUNDAY), at most two
    #[serde(default)]
    pub weekdays: String,
    /// Start time (HH:MM)
    pub start_time: String,
    /// End time (HH:MM)
    pub end_time: String,
    #[schema(value_type = String, example = "4500.00")]
    pub price: Decimal,
    #[serde(default)]
    pub is_permanent: bool,
}

/// Update group request; missing fields keep their current value.
/// `description: null` clears the description.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGroup {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub weekdays: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    pub is_permanent: Option<bool>,
}

/// Fully validated group fields, ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct GroupFields {
    pub name: String,
    pub description: Option<String>,
    pub weekdays: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub price: Decimal,
    pub is_permanent: bool,
}
