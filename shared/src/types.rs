//! Common types used across the platform

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// All stores run on Jakarta civil time (UTC+7, no DST)
pub fn jakarta() -> FixedOffset {
    FixedOffset::east_opt(7 * 3600).expect("fixed +07:00 offset")
}

/// Civil date of an instant in Jakarta time
pub fn local_date(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&jakarta()).date_naive()
}

/// Wall-clock time of an instant in Jakarta time
pub fn local_time(instant: DateTime<Utc>) -> NaiveTime {
    instant.with_timezone(&jakarta()).time()
}

/// Fixed time-of-day buckets used by the dashboards. Half-open:
/// an order at exactly 11:00 belongs to Lunch, not Morning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeDivision {
    Morning,
    Lunch,
    AfterLunch,
    Afternoon,
}

impl TimeDivision {
    pub const ALL: [TimeDivision; 4] = [
        TimeDivision::Morning,
        TimeDivision::Lunch,
        TimeDivision::AfterLunch,
        TimeDivision::Afternoon,
    ];

    /// [start, end) bounds in local wall-clock time
    pub fn bounds(&self) -> (NaiveTime, NaiveTime) {
        let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).expect("valid bucket bound");
        match self {
            TimeDivision::Morning => (t(9, 0), t(11, 0)),
            TimeDivision::Lunch => (t(11, 0), t(13, 0)),
            TimeDivision::AfterLunch => (t(13, 0), t(15, 0)),
            TimeDivision::Afternoon => (t(15, 0), t(18, 0)),
        }
    }

    pub fn contains(&self, local: NaiveTime) -> bool {
        let (start, end) = self.bounds();
        start <= local && local < end
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeDivision::Morning => "Morning (09-11)",
            TimeDivision::Lunch => "Lunch (11-13)",
            TimeDivision::AfterLunch => "After Lunch (13-15)",
            TimeDivision::Afternoon => "Afternoon (15-18)",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "morning" => Some(TimeDivision::Morning),
            "lunch" => Some(TimeDivision::Lunch),
            "after_lunch" => Some(TimeDivision::AfterLunch),
            "afternoon" => Some(TimeDivision::Afternoon),
            _ => None,
        }
    }
}

/// Inclusive civil-date range filter; either bound may be open
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }
}
