use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::period::{MonthKey, PeriodKey};
use super::series::TimePoint;

/// Trailing 12-month return at one date, in percentage points.
/// `None` until the series has a full year of history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollingPoint {
    pub date: NaiveDate,
    pub rolling_12m: Option<f64>,
}

/// One rebased curve of a comparative return chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSeries {
    /// Series key as sent by the API
    pub key: String,

    /// Display label ("Carteira" for the portfolio aggregate)
    pub label: String,

    /// One point per axis date, starting at 0
    pub points: Vec<TimePoint>,
}

/// A per-month value: either a first-of-month level or a monthly return.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBucket {
    pub month: MonthKey,
    pub value: f64,
}

/// Monthly return for one heatmap cell, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub year: i32,
    /// 0 = January
    pub month_index: usize,
    pub value: Option<f64>,
}

/// One heatmap row: twelve monthly cells plus the compounded annual figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapYear {
    pub year: i32,
    pub months: [Option<f64>; 12],
    /// `None` when the year has no populated month.
    pub annual: Option<f64>,
}

/// Summed flow amount for one period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowBucket {
    pub period: PeriodKey,
    pub total: f64,
}

/// Summed flow amounts for one period, split by category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryFlowBucket {
    pub period: PeriodKey,
    pub totals: BTreeMap<String, f64>,
}
