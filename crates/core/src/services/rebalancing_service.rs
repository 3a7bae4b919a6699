use crate::errors::CoreError;
use crate::models::rebalancing::{RebalancingResponse, UNCATEGORIZED_ID};

/// Recomputes rebalancing targets and deltas over the category → asset hierarchy.
///
/// Every edit goes through [`RebalancingService::recalc_all_diffs`], which
/// rebuilds the whole tree from the user-set percentages. There is no
/// incremental patching, so a changed category target can never leave stale
/// asset numbers behind.
pub struct RebalancingService;

impl RebalancingService {
    pub fn new() -> Self {
        Self
    }

    /// Portfolio total plus the what-if contribution (none = 0).
    pub fn effective_total(&self, total_value: f64, contribution: Option<f64>) -> f64 {
        total_value + contribution.unwrap_or(0.0)
    }

    /// Full recompute of every derived field.
    ///
    /// Category: `target_value = effective_total × target_pct / 100`, diffs
    /// against the current value and percentage, all `None` when untargeted.
    ///
    /// Asset: only when both the asset's `target_pct_in_category` and the
    /// category's `target_value` are known, `target_value = category target ×
    /// pct / 100`, diffs rounded to cents. Otherwise all three derived asset
    /// fields are cleared. Asset targets are not normalized to their category.
    pub fn recalc_all_diffs(
        &self,
        state: &RebalancingResponse,
        effective_total: f64,
    ) -> RebalancingResponse {
        let mut next = state.clone();

        for category in &mut next.categories {
            category.target_value = category.target_pct.map(|pct| effective_total * pct / 100.0);
            category.diff_pct = category.target_pct.map(|pct| pct - category.current_pct);
            category.diff_value = category.target_value.map(|v| v - category.current_value);

            let category_target = category.target_value;
            for asset in &mut category.assets {
                match (asset.target_pct_in_category, category_target) {
                    (Some(pct), Some(category_value)) => {
                        let target_value = category_value * pct / 100.0;
                        asset.target_value = Some(round_cents(target_value));
                        asset.diff_pct = Some(round_cents(pct - asset.current_pct_in_category));
                        asset.diff_value = Some(round_cents(target_value - asset.current_value));
                    }
                    _ => {
                        asset.target_value = None;
                        asset.diff_pct = None;
                        asset.diff_value = None;
                    }
                }
            }
        }

        next
    }

    /// Set or clear a category target, then recompute everything.
    pub fn set_category_target(
        &self,
        state: &RebalancingResponse,
        category_id: i64,
        target_pct: Option<f64>,
        effective_total: f64,
    ) -> Result<RebalancingResponse, CoreError> {
        if category_id == UNCATEGORIZED_ID {
            return Err(CoreError::Validation(
                "the uncategorized group cannot have a target".to_string(),
            ));
        }
        validate_pct(target_pct)?;

        let mut edited = state.clone();
        let category = edited
            .category_mut(category_id)
            .ok_or_else(|| CoreError::NotFound(format!("category {category_id}")))?;
        category.target_pct = target_pct;

        Ok(self.recalc_all_diffs(&edited, effective_total))
    }

    /// Set or clear an asset's target share within its category, then recompute everything.
    pub fn set_asset_target(
        &self,
        state: &RebalancingResponse,
        category_id: i64,
        asset_id: i64,
        target_pct_in_category: Option<f64>,
        effective_total: f64,
    ) -> Result<RebalancingResponse, CoreError> {
        validate_pct(target_pct_in_category)?;

        let mut edited = state.clone();
        let asset = edited
            .category_mut(category_id)
            .ok_or_else(|| CoreError::NotFound(format!("category {category_id}")))?
            .asset_mut(asset_id)
            .ok_or_else(|| {
                CoreError::NotFound(format!("asset {asset_id} in category {category_id}"))
            })?;
        asset.target_pct_in_category = target_pct_in_category;

        Ok(self.recalc_all_diffs(&edited, effective_total))
    }
}

impl Default for RebalancingService {
    fn default() -> Self {
        Self::new()
    }
}

/// Round to 2 decimals, halves up (toward +∞).
pub fn round_cents(x: f64) -> f64 {
    (x * 100.0 + 0.5).floor() / 100.0
}

fn validate_pct(pct: Option<f64>) -> Result<(), CoreError> {
    match pct {
        Some(p) if !p.is_finite() || !(0.0..=100.0).contains(&p) => Err(CoreError::Validation(
            format!("target percentage must be between 0 and 100, got {p}"),
        )),
        _ => Ok(()),
    }
}
