//! Employee, attendance and payroll models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Salary docked for clocking out between 8.5 and 9 hours, in rupiah
pub const LATE_FINISH_PENALTY: i64 = 10_000;

/// One shift: check-in, and check-out once the shift ends
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attendance {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub store_id: Option<Uuid>,
    pub check_in: DateTime<Utc>,
    pub check_out: Option<DateTime<Utc>>,
    pub payroll_id: Option<Uuid>,
}

impl Attendance {
    /// Hours between check-in and check-out; zero while still clocked in
    pub fn duration_in_hours(&self) -> f64 {
        match self.check_out {
            Some(out) => (out - self.check_in).num_seconds() as f64 / 3600.0,
            None => 0.0,
        }
    }

    /// Hours worked so far, using `now` for open shifts
    pub fn hours_worked(&self, now: DateTime<Utc>) -> f64 {
        let end = self.check_out.unwrap_or(now);
        (end - self.check_in).num_seconds() as f64 / 3600.0
    }

    /// Pay earned for this shift under the tiered daily-rate scheme
    pub fn salary_earned(&self, daily_salary: i64) -> i64 {
        salary_for_hours(self.duration_in_hours(), daily_salary)
    }
}

/// Tiered daily pay: a full day needs 9 hours, 8.5 hours costs a fixed
/// penalty, 5 hours earns half a day (integer division), less earns
/// nothing.
pub fn salary_for_hours(hours: f64, daily_salary: i64) -> i64 {
    if hours >= 9.0 {
        daily_salary
    } else if hours >= 8.5 {
        daily_salary - LATE_FINISH_PENALTY
    } else if hours >= 5.0 {
        daily_salary / 2
    } else {
        0
    }
}

