pub mod analytics_service;
pub mod period_service;
pub mod rebalancing_service;
pub mod returns_service;
pub mod series_service;
