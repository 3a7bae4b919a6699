use serde::{Deserialize, Serialize};

/// Category id the API uses for "uncategorized". It cannot be targeted
/// and is never submitted back.
pub const UNCATEGORIZED_ID: i64 = 0;

/// Root of the rebalancing hierarchy (`GET/PUT /portfolio/{id}/rebalancing`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RebalancingResponse {
    pub total_value: f64,
    #[serde(default)]
    pub categories: Vec<CategoryRebalancingEntry>,
}

/// One category with its user-set target and derived deltas.
///
/// `target_pct == None` means the category is not targeted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRebalancingEntry {
    pub category_id: i64,
    pub category_name: String,
    #[serde(default)]
    pub color: Option<String>,
    pub current_value: f64,
    /// Share of the portfolio total, in percent
    pub current_pct: f64,
    #[serde(default)]
    pub target_pct: Option<f64>,
    #[serde(default)]
    pub target_value: Option<f64>,
    #[serde(default)]
    pub diff_pct: Option<f64>,
    #[serde(default)]
    pub diff_value: Option<f64>,
    #[serde(default)]
    pub assets: Vec<AssetRebalancingEntry>,
}

/// One asset inside a category. Percentages are relative to the category,
/// not to the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRebalancingEntry {
    pub asset_id: i64,
    pub ticker: String,
    #[serde(default)]
    pub name: String,
    pub current_value: f64,
    pub current_pct_in_category: f64,
    #[serde(default)]
    pub target_pct_in_category: Option<f64>,
    #[serde(default)]
    pub target_value: Option<f64>,
    #[serde(default)]
    pub diff_pct: Option<f64>,
    #[serde(default)]
    pub diff_value: Option<f64>,
}

impl RebalancingResponse {
    pub fn category(&self, category_id: i64) -> Option<&CategoryRebalancingEntry> {
        self.categories.iter().find(|c| c.category_id == category_id)
    }

    pub fn category_mut(&mut self, category_id: i64) -> Option<&mut CategoryRebalancingEntry> {
        self.categories
            .iter_mut()
            .find(|c| c.category_id == category_id)
    }

    /// Sum of the category targets that are set, in percent.
    /// Not required to equal 100; the UI only warns on it.
    pub fn target_pct_sum(&self) -> f64 {
        self.categories.iter().filter_map(|c| c.target_pct).sum()
    }

    /// Copy of the hierarchy without the uncategorized pseudo-category,
    /// as submitted on save.
    pub fn without_uncategorized(&self) -> Self {
        Self {
            total_value: self.total_value,
            categories: self
                .categories
                .iter()
                .filter(|c| c.category_id != UNCATEGORIZED_ID)
                .cloned()
                .collect(),
        }
    }
}

impl CategoryRebalancingEntry {
    pub fn asset_mut(&mut self, asset_id: i64) -> Option<&mut AssetRebalancingEntry> {
        self.assets.iter_mut().find(|a| a.asset_id == asset_id)
    }
}
