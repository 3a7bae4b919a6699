use serde::{Deserialize, Serialize};

/// One row of `GET /portfolio/{id}/position`.
///
/// Consolidation happens server-side; the core only reads these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioPositionEntry {
    pub ticker: String,

    #[serde(default)]
    pub name: Option<String>,

    pub quantity: f64,

    /// Last price per unit
    pub price: f64,

    /// quantity × price, in the portfolio currency
    pub value: f64,

    /// Category name the asset belongs to
    pub category: String,

    /// Trailing 12-month return in percent, when the server computed one
    #[serde(default)]
    pub twelve_months_return: Option<f64>,

    /// Return since first purchase, in percent
    #[serde(default)]
    pub acc_return: Option<f64>,

    #[serde(default)]
    pub average_price: Option<f64>,
}
