use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::dividend::Dividend;
use crate::models::patrimony::PatrimonyEntry;
use crate::models::position::PortfolioPositionEntry;
use crate::models::rebalancing::RebalancingResponse;
use crate::models::series::{NamedSeries, PortfolioReturns};

/// The Carteira API as seen by the core.
///
/// Consolidation, tax calculation and historical series generation all happen
/// server-side; the core only consumes these payloads. Tests and alternative
/// transports implement this trait instead of talking HTTP.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait PortfolioApi: Send + Sync {
    /// `GET /portfolio/{id}/position`
    async fn get_positions(&self, portfolio_id: i64)
        -> Result<Vec<PortfolioPositionEntry>, CoreError>;

    /// `GET /portfolio/{id}/returns`
    async fn get_returns(&self, portfolio_id: i64) -> Result<PortfolioReturns, CoreError>;

    /// `GET /market_data/indexes/time_series`
    async fn get_benchmarks(&self) -> Result<NamedSeries, CoreError>;

    /// `GET /portfolio/{id}/patrimony_evolution`
    async fn get_patrimony_evolution(
        &self,
        portfolio_id: i64,
    ) -> Result<Vec<PatrimonyEntry>, CoreError>;

    /// `GET /portfolio/dividends/{id}`
    async fn get_dividends(&self, portfolio_id: i64) -> Result<Vec<Dividend>, CoreError>;

    /// `GET /portfolio/{id}/rebalancing`
    async fn get_rebalancing(&self, portfolio_id: i64) -> Result<RebalancingResponse, CoreError>;

    /// `PUT /portfolio/{id}/rebalancing`
    async fn put_rebalancing(
        &self,
        portfolio_id: i64,
        body: &RebalancingResponse,
    ) -> Result<RebalancingResponse, CoreError>;
}
