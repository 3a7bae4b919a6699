use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::chart::{
    CategoryFlowBucket, ComparisonSeries, FlowBucket, HeatmapYear, MonthlyBucket, RollingPoint,
};
use super::period::{MonthKey, RangeKey};
use super::position::PortfolioPositionEntry;

/// Share of the portfolio held in one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAllocation {
    pub category: String,

    /// Summed position value
    pub value: f64,

    /// value / total × 100, or 0 when the total is 0
    pub pct: f64,
}

/// First-of-month patrimony level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatrimonyMonth {
    pub month: MonthKey,

    /// Sum of category values on the first recorded day of the month
    pub total: f64,

    /// Accumulated contributions on that same day
    pub acc_aported: f64,

    /// Per-category values on that same day
    pub categories: BTreeMap<String, f64>,
}

/// Everything the returns page renders, derived from one fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnsView {
    pub range: RangeKey,

    /// Ranges worth offering given the age of the data
    pub available_ranges: Vec<RangeKey>,

    /// Rebased curves (portfolio, categories, benchmarks) on a shared axis
    pub comparison: Vec<ComparisonSeries>,

    /// Trailing 12-month return of the portfolio aggregate
    pub rolling_12m: Vec<RollingPoint>,

    /// Monthly returns of the portfolio aggregate, in percent
    pub monthly_returns: Vec<MonthlyBucket>,

    pub heatmap: Vec<HeatmapYear>,

    /// Table column: 12-month return per asset ticker
    pub twelve_month_returns: BTreeMap<String, Option<f64>>,
}

/// Everything the overview page renders, derived from one fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewView {
    pub positions: Vec<PortfolioPositionEntry>,
    pub allocation: Vec<CategoryAllocation>,
    pub total_value: f64,

    /// Dividends summed per month
    pub dividends_by_month: Vec<FlowBucket>,

    /// Dividends summed per year and category
    pub dividends_by_year_and_category: Vec<CategoryFlowBucket>,

    pub patrimony: Vec<PatrimonyMonth>,
}
