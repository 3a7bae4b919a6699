use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One day of `GET /portfolio/{id}/patrimony_evolution`.
///
/// Besides `date` and `acc_aported`, every other key of the JSON object
/// is a category name mapped to that category's value on the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatrimonyEntry {
    pub date: NaiveDate,

    /// Accumulated contributions up to this date
    #[serde(default)]
    pub acc_aported: f64,

    #[serde(flatten)]
    pub categories: BTreeMap<String, f64>,
}

impl PatrimonyEntry {
    /// Sum of all category values on this day.
    pub fn total(&self) -> f64 {
        self.categories.values().sum()
    }
}
