pub mod analytics;
pub mod chart;
pub mod dividend;
pub mod patrimony;
pub mod period;
pub mod position;
pub mod rebalancing;
pub mod series;
pub mod settings;
