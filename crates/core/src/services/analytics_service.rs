use std::collections::BTreeMap;

use crate::models::analytics::CategoryAllocation;
use crate::models::position::PortfolioPositionEntry;

/// Allocation breakdown over server-consolidated positions.
pub struct AnalyticsService;

impl AnalyticsService {
    pub fn new() -> Self {
        Self
    }

    /// Sum of all position values.
    pub fn total_value(&self, positions: &[PortfolioPositionEntry]) -> f64 {
        positions.iter().map(|p| p.value).sum()
    }

    /// Value and share per category, largest first.
    ///
    /// Shares are 0 when the portfolio total is 0.
    pub fn allocation_by_category(
        &self,
        positions: &[PortfolioPositionEntry],
    ) -> Vec<CategoryAllocation> {
        let mut by_category: BTreeMap<&str, f64> = BTreeMap::new();
        for position in positions {
            *by_category.entry(position.category.as_str()).or_insert(0.0) += position.value;
        }

        let total = self.total_value(positions);
        let mut allocation: Vec<CategoryAllocation> = by_category
            .into_iter()
            .map(|(category, value)| CategoryAllocation {
                category: category.to_string(),
                value,
                pct: if total > 0.0 { value / total * 100.0 } else { 0.0 },
            })
            .collect();

        // Sort by allocation (largest first); ties keep name order
        allocation.sort_by(|a, b| {
            b.value
                .partial_cmp(&a.value)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        allocation
    }
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new()
    }
}
