//! Attendance accrual: classes attended since the last payment
//!
//! A customer's billing window is the closed range
//! `[last_payment_date, as_of]`. Every PRESENT attendance whose date, taken as
//! the start of that calendar day in UTC, falls inside the window counts once.
//! Once the count reaches [`OVERDUE_THRESHOLD`] the customer is due to pay.
//! Recording a payment only moves the lower bound forward; attendance rows are
//! never touched.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{Attendance, Customer};

/// Attended classes after which a customer is overdue
pub const OVERDUE_THRESHOLD: i64 = 7;

/// Billing state of one customer at a given instant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Accrual {
    pub attendance_count: i64,
    pub overdue: bool,
}

impl Accrual {
    pub fn from_count(attendance_count: i64) -> Self {
        Self {
            attendance_count,
            overdue: attendance_count >= OVERDUE_THRESHOLD,
        }
    }
}

/// Closed instant range `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccrualWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl AccrualWindow {
    pub fn new(last_payment_date: DateTime<Utc>, as_of: DateTime<Utc>) -> Self {
        Self {
            start: last_payment_date,
            end: as_of,
        }
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        let instant = start_of_day(date);
        instant >= self.start && instant <= self.end
    }

    /// Inclusive calendar-date range covering every date the window can
    /// contain. Stores may prefilter with it; the window test is still applied.
    pub fn date_bounds(&self) -> (NaiveDate, NaiveDate) {
        (self.start.date_naive(), self.end.date_naive())
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn counts_toward(attendance: &Attendance, window: &AccrualWindow) -> bool {
    attendance.status.is_present() && window.contains_date(attendance.date)
}

/// Accrual for a single customer. `attendances` may contain rows of other
/// customers or outside the window; they are ignored.
pub fn accrue(customer: &Customer, attendances: &[Attendance], as_of: DateTime<Utc>) -> Accrual {
    let window = AccrualWindow::new(customer.last_payment_date, as_of);
    let count = attendances
        .iter()
        .filter(|a| a.customer_id == customer.id && counts_toward(a, &window))
        .count();
    Accrual::from_count(count as i64)
}

/// Accrual for many customers from one shared attendance batch.
///
/// Every customer in `customers` gets an entry, including those without any
/// attendance.
pub fn accrue_many(
    customers: &[Customer],
    attendances: &[Attendance],
    as_of: DateTime<Utc>,
) -> HashMap<i32, Accrual> {
    let mut by_customer: HashMap<i32, Vec<&Attendance>> = HashMap::new();
    for attendance in attendances {
        by_customer
            .entry(attendance.customer_id)
            .or_default()
            .push(attendance);
    }

    customers
        .iter()
        .map(|customer| {
            let window = AccrualWindow::new(customer.last_payment_date, as_of);
            let count = by_customer
                .get(&customer.id)
                .map(|rows| rows.iter().filter(|a| counts_toward(a, &window)).count())
                .unwrap_or(0);
            (customer.id, Accrual::from_count(count as i64))
        })
        .collect()
}

/// Date range a bulk attendance query must cover for `customers`, or `None`
/// when no customer's window is open at `as_of`.
pub fn bulk_date_bounds(
    customers: &[Customer],
    as_of: DateTime<Utc>,
) -> Option<(NaiveDate, NaiveDate)> {
    customers
        .iter()
        .map(|c| c.last_payment_date)
        .filter(|start| *start <= as_of)
        .min()
        .map(|earliest| AccrualWindow::new(earliest, as_of).date_bounds())
}
