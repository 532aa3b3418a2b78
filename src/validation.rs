//! Schedule and customer field validation, age computation

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime};
use thiserror::Error;

use crate::models::enums::Weekday;

/// A group may meet on at most this many weekdays
pub const MAX_WEEKDAYS: usize = 2;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("At most {max} weekdays may be specified, got {count}")]
    InvalidWeekdayCount { count: usize, max: usize },

    #[error("Invalid weekday: {token:?}. Allowed: MONDAY, TUESDAY, WEDNESDAY, THURSDAY, FRIDAY, SATURDAY, SUNDAY")]
    InvalidWeekdayToken { token: String },

    #[error("Start time must be before end time")]
    InvalidTimeRange,

    #[error("Invalid time {0:?} (expected HH:MM)")]
    InvalidTime(String),
}

/// Parse a comma-separated weekday list such as `"MONDAY, THURSDAY"`.
///
/// Blank input is valid and yields no days.
pub fn validate_weekdays(weekdays: &str) -> Result<Vec<Weekday>, ValidationError> {
    if weekdays.trim().is_empty() {
        return Ok(Vec::new());
    }

    let tokens: Vec<&str> = weekdays.split(',').map(str::trim).collect();
    if tokens.len() > MAX_WEEKDAYS {
        return Err(ValidationError::InvalidWeekdayCount {
            count: tokens.len(),
            max: MAX_WEEKDAYS,
        });
    }

    tokens
        .into_iter()
        .map(|token| {
            token
                .parse::<Weekday>()
                .map_err(|_| ValidationError::InvalidWeekdayToken {
                    token: token.to_string(),
                })
        })
        .collect()
}

/// Canonical storage form of a weekday list
pub fn join_weekdays(days: &[Weekday]) -> String {
    days.iter()
        .map(|d| d.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

pub fn validate_time_range(start: NaiveTime, end: NaiveTime) -> Result<(), ValidationError> {
    if start >= end {
        return Err(ValidationError::InvalidTimeRange);
    }
    Ok(())
}

/// Parse a wall-clock time. Accepts `HH:MM`, `HH:MM:SS` or an RFC 3339
/// timestamp, in which case only the time of day is kept.
pub fn parse_wall_clock(value: &str) -> Result<NaiveTime, ValidationError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.time()))
        .map_err(|_| ValidationError::InvalidTime(value.to_string()))
}

/// Whole years between `date_of_birth` and `today`, never negative
pub fn age_in_years(date_of_birth: NaiveDate, today: NaiveDate) -> u32 {
    let mut age = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age.max(0) as u32
}

/// Russian noun form for a number of years: год / года / лет
pub fn years_noun(age: u32) -> &'static str {
    if (11..=19).contains(&(age % 100)) {
        return "лет";
    }
    match age % 10 {
        1 => "год",
        2..=4 => "года",
        _ => "лет",
    }
}

/// Age as a display phrase, e.g. "21 год", "3 года", "12 лет"
pub fn calculate_age(date_of_birth: NaiveDate, today: NaiveDate) -> String {
    let age = age_in_years(date_of_birth, today);
    format!("{} {}", age, years_noun(age))
}
