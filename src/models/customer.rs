//! Customer model

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::group::GroupShort;

/// Digits with optional leading +, spaces, dashes and parentheses
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9][0-9 ()\-]{4,19}$").expect("valid phone regex"));

/// Customer record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub date_of_birth: NaiveDate,
    pub group_id: Option<i32>,
    /// Start of the current billing window; moved forward by recording a payment
    pub last_payment_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Short customer representation (group member lists)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerShort {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub group_id: Option<i32>,
}

/// Customer with derived fields: age phrase, group and billing state
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetails {
    #[serde(flatten)]
    pub customer: Customer,
    /// Age phrase, e.g. "12 лет"
    pub age: String,
    pub group: Option<GroupShort>,
    /// Classes attended since the last payment
    pub attendance_count: i64,
    /// Attendance count reached the billing threshold
    pub overdue: bool,
}

/// Create customer request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomer {
    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: String,
    #[validate(regex(path = *PHONE_RE, message = "Invalid phone number"))]
    pub phone_number: String,
    /// Blank means no email
    #[validate(email(message = "Invalid email format"))]
    #[serde(default, deserialize_with = "super::blank_as_none::deserialize")]
    pub email: Option<String>,
    /// Date of birth (YYYY-MM-DD)
    #[serde(deserialize_with = "super::iso_date::deserialize")]
    #[schema(value_type = String, format = Date)]
    pub date_of_birth: NaiveDate,
    pub group_id: Option<i32>,
}

/// Update customer request; missing fields keep their current value.
/// `groupId: null` removes the customer from their group.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomer {
    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: Option<String>,
    #[validate(regex(path = *PHONE_RE, message = "Invalid phone number"))]
    pub phone_number: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::iso_date::option::deserialize")]
    #[schema(value_type = Option<String>, format = Date)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i32>)]
    pub group_id: Option<Option<i32>>,
}

/// Fully validated customer fields, ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerFields {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub date_of_birth: NaiveDate,
    pub group_id: Option<i32>,
}

impl CustomerFields {
    /// Apply a partial update on top of an existing customer
    pub fn merged(customer: &Customer, update: &UpdateCustomer) -> Self {
        Self {
            first_name: update
                .first_name
                .clone()
                .unwrap_or_else(|| customer.first_name.clone()),
            last_name: update
                .last_name
                .clone()
                .unwrap_or_else(|| customer.last_name.clone()),
            phone_number: update
                .phone_number
                .clone()
                .unwrap_or_else(|| customer.phone_number.clone()),
            email: update.email.clone().unwrap_or_else(|| customer.email.clone()),
            date_of_birth: update.date_of_birth.unwrap_or(customer.date_of_birth),
            group_id: update.group_id.unwrap_or(customer.group_id),
        }
    }
}

impl From<CreateCustomer> for CustomerFields {
    fn from(data: CreateCustomer) -> Self {
        Self {
            first_name: data.first_name,
            last_name: data.last_name,
            phone_number: data.phone_number,
            email: data.email,
            date_of_birth: data.date_of_birth,
            group_id: data.group_id,
        }
    }
}

/// Query parameters for billing-derived views
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct AccrualQuery {
    /// Evaluate the billing window at this instant instead of now (RFC 3339)
    pub as_of: Option<DateTime<Utc>>,
}
