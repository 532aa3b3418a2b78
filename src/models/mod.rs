//! Data models for the studio server

pub mod attendance;
pub mod customer;
pub mod enums;
pub mod group;
pub mod user;

// Re-export commonly used types
pub use attendance::{Attendance, AttendanceDetails};
pub use customer::{Customer, CustomerDetails, CustomerShort};
pub use enums::{AttendanceStatus, Weekday};
pub use group::{Group, GroupDetails, GroupShort};
pub use user::{User, UserClaims};

use chrono::{DateTime, NaiveDate};

/// Parse a calendar date sent either as `YYYY-MM-DD` or as a full
/// RFC 3339 timestamp (browsers often send `2024-03-01T00:00:00.000Z`).
pub fn parse_iso_date(value: &str) -> Result<NaiveDate, String> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.date_naive()))
        .map_err(|_| format!("Invalid date {:?} (expected YYYY-MM-DD)", value))
}

/// Serde adapter for [`parse_iso_date`]
pub mod iso_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::parse_iso_date(&s).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use chrono::NaiveDate;
        use serde::{Deserialize, Deserializer};

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
        where
            D: Deserializer<'de>,
        {
            Option::<String>::deserialize(deserializer)?
                .map(|s| super::super::parse_iso_date(&s).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}

/// Serde adapter for optional text fields where forms send `""` for "not set"
pub mod blank_as_none {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<String>::deserialize(deserializer)?
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()))
    }
}
