use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::CoreError;

/// A calendar month, ordered chronologically.
///
/// Buckets are keyed by this tuple; the `YYYY-MM` string only
/// exists at presentation time via `Display`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthKey {
    pub year: i32,
    /// 1-12
    pub month: u32,
}

impl MonthKey {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Months since year 0: `year * 12 + (month - 1)`.
    pub fn ordinal(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }

    /// Zero-based month index (0 = January).
    pub fn month_index(&self) -> usize {
        (self.month as usize).saturating_sub(1)
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Bucket width for flow aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Granularity {
    Day,
    Month,
    Year,
}

/// Bucket key produced by flow aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PeriodKey {
    Day(NaiveDate),
    Month(MonthKey),
    Year(i32),
}

impl PeriodKey {
    pub fn of(date: NaiveDate, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Day => PeriodKey::Day(date),
            Granularity::Month => PeriodKey::Month(MonthKey::of(date)),
            Granularity::Year => PeriodKey::Year(date.year()),
        }
    }
}

impl std::fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PeriodKey::Day(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            PeriodKey::Month(m) => write!(f, "{m}"),
            PeriodKey::Year(y) => write!(f, "{y:04}"),
        }
    }
}

/// Longest "N years back" range offered.
pub const MAX_RANGE_YEARS: u32 = 10;

/// Date-range selector for charts: `ytd`, `1y`..`10y`, `max`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangeKey {
    /// Since January 1st of the current year.
    Ytd,
    /// The last N years (1..=10).
    Years(u32),
    /// Everything.
    #[default]
    Max,
}

impl RangeKey {
    /// First date included by this range, relative to `today`.
    pub fn cutoff(&self, today: NaiveDate) -> NaiveDate {
        match self {
            RangeKey::Ytd => NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
            RangeKey::Years(n) => today
                .checked_sub_months(Months::new(n.saturating_mul(12)))
                .unwrap_or(NaiveDate::MIN),
            RangeKey::Max => NaiveDate::default(),
        }
    }
}

impl std::fmt::Display for RangeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RangeKey::Ytd => write!(f, "ytd"),
            RangeKey::Years(n) => write!(f, "{n}y"),
            RangeKey::Max => write!(f, "max"),
        }
    }
}

impl FromStr for RangeKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        match key.as_str() {
            "ytd" => Ok(RangeKey::Ytd),
            "max" => Ok(RangeKey::Max),
            _ => {
                let years = key
                    .strip_suffix('y')
                    .and_then(|n| n.parse::<u32>().ok())
                    .filter(|n| (1..=MAX_RANGE_YEARS).contains(n))
                    .ok_or_else(|| CoreError::Validation(format!("unknown range key '{s}'")))?;
                Ok(RangeKey::Years(years))
            }
        }
    }
}
