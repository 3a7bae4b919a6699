use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Series key of the whole-portfolio aggregate.
pub const PORTFOLIO_KEY: &str = "portfolio";

/// Display label used for [`PORTFOLIO_KEY`].
pub const PORTFOLIO_LABEL: &str = "Carteira";

/// A single observation (date → value).
///
/// `value` is usually a cumulative-return fraction since inception
/// (0.153 = +15.3%) and sometimes a currency amount.
/// Producers do not guarantee sorted or deduplicated dates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl TimePoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Series key (category name, benchmark code or ticker) → points.
pub type NamedSeries = BTreeMap<String, Vec<TimePoint>>;

/// Response of `GET /portfolio/{id}/returns`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioReturns {
    /// Per-category series, plus the `"portfolio"` aggregate.
    #[serde(default)]
    pub categories: NamedSeries,

    /// Per-asset series keyed by ticker.
    #[serde(default)]
    pub assets: NamedSeries,
}

impl PortfolioReturns {
    /// The whole-portfolio series, if the API sent one.
    pub fn portfolio(&self) -> Option<&[TimePoint]> {
        self.categories.get(PORTFOLIO_KEY).map(Vec::as_slice)
    }
}

/// Human-readable label for a series key.
pub fn series_label(key: &str) -> &str {
    if key == PORTFOLIO_KEY {
        PORTFOLIO_LABEL
    } else {
        key
    }
}

/// Return a copy of `series` sorted ascending by date.
/// The sort is stable, so same-day points keep their source order.
pub fn sorted_by_date(series: &[TimePoint]) -> Vec<TimePoint> {
    let mut sorted = series.to_vec();
    sorted.sort_by_key(|p| p.date);
    sorted
}
