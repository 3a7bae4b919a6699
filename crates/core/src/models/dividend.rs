use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A dividend (or other income) payment from `GET /portfolio/dividends/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dividend {
    pub date: NaiveDate,

    /// Amount received, in the portfolio currency
    pub amount: f64,

    /// Category name of the paying asset
    pub category: String,

    #[serde(default)]
    pub ticker: Option<String>,
}
