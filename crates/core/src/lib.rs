pub mod errors;
pub mod logging;
pub mod models;
pub mod providers;
pub mod services;
pub mod state;

use chrono::NaiveDate;
use models::{
    analytics::{OverviewView, ReturnsView},
    chart::{CategoryFlowBucket, RollingPoint},
    period::Granularity,
    rebalancing::RebalancingResponse,
    series::{NamedSeries, PORTFOLIO_KEY},
    settings::ApiSettings,
};
use providers::{http::HttpPortfolioApi, traits::PortfolioApi};
use services::{
    analytics_service::AnalyticsService, period_service::PeriodService,
    rebalancing_service::RebalancingService, returns_service::ReturnsService,
    series_service::SeriesService,
};
use state::{AppStore, FetchTicket};

use errors::CoreError;

/// Main entry point for the Carteira core library.
///
/// Fetches payloads through a [`PortfolioApi`] and turns them into
/// render-ready views. The frontend only draws what comes back.
///
/// Every view method:
/// 1. takes a [`FetchTicket`] from the store
/// 2. issues its fetches in parallel and waits for all of them
/// 3. returns `Ok(None)` if the store moved on in the meantime
/// 4. otherwise derives the view from scratch
#[must_use]
pub struct PortfolioDashboard<A: PortfolioApi> {
    api: A,
    store: AppStore,
    series_service: SeriesService,
    returns_service: ReturnsService,
    period_service: PeriodService,
    rebalancing_service: RebalancingService,
    analytics_service: AnalyticsService,
}

impl<A: PortfolioApi> std::fmt::Debug for PortfolioDashboard<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.store.snapshot();
        f.debug_struct("PortfolioDashboard")
            .field("portfolio_id", &state.portfolio_id)
            .field("refresh_key", &state.refresh_key)
            .field("range", &state.range)
            .field("rebalancing_loaded", &state.rebalancing.is_some())
            .finish()
    }
}

impl PortfolioDashboard<HttpPortfolioApi> {
    /// Dashboard talking to the real API.
    pub fn connect(settings: &ApiSettings, store: AppStore) -> Self {
        Self::new(HttpPortfolioApi::new(settings), store)
    }
}

impl<A: PortfolioApi> PortfolioDashboard<A> {
    pub fn new(api: A, store: AppStore) -> Self {
        Self {
            api,
            store,
            series_service: SeriesService::new(),
            returns_service: ReturnsService::new(),
            period_service: PeriodService::new(),
            rebalancing_service: RebalancingService::new(),
            analytics_service: AnalyticsService::new(),
        }
    }

    #[must_use]
    pub fn store(&self) -> &AppStore {
        &self.store
    }

    // ── Views ───────────────────────────────────────────────────────

    /// Returns page: comparative curves, rolling 12-month return, monthly
    /// returns, heatmap and the per-asset 12-month table column.
    pub async fn returns_view(&self, today: NaiveDate) -> Result<Option<ReturnsView>, CoreError> {
        let ticket = self.store.ticket()?;
        let (returns, benchmarks) = futures::try_join!(
            self.api.get_returns(ticket.portfolio_id),
            self.api.get_benchmarks(),
        )?;
        if !self.accept(&ticket, "returns") {
            return Ok(None);
        }

        let range = self.store.range();
        let cutoff = range.cutoff(today);
        let portfolio = returns.portfolio().unwrap_or_default();

        // Benchmarks never shadow a category of the same name.
        let mut merged: NamedSeries = returns.categories.clone();
        for (key, series) in &benchmarks {
            merged.entry(key.clone()).or_insert_with(|| series.clone());
        }
        let category_keys = returns
            .categories
            .keys()
            .map(String::as_str)
            .filter(|k| *k != PORTFOLIO_KEY);
        let benchmark_keys = benchmarks
            .keys()
            .map(String::as_str)
            .filter(|k| !returns.categories.contains_key(*k));
        let keys: Vec<&str> = std::iter::once(PORTFOLIO_KEY)
            .chain(category_keys)
            .chain(benchmark_keys)
            .collect();

        // The window needs history from before the cutoff, so filter afterwards.
        let rolling_12m: Vec<RollingPoint> = self
            .returns_service
            .rolling_12m(portfolio)
            .into_iter()
            .filter(|p| p.date >= cutoff)
            .collect();

        let in_range = self.period_service.filter_range(portfolio, range, today);

        Ok(Some(ReturnsView {
            range,
            available_ranges: self
                .period_service
                .available_ranges(portfolio.iter().map(|p| p.date).min(), today),
            comparison: self.series_service.compare(&merged, &keys, cutoff),
            rolling_12m,
            monthly_returns: self.period_service.monthly_returns(&in_range),
            heatmap: self.period_service.heatmap(portfolio),
            twelve_month_returns: self.returns_service.twelve_month_returns(&returns.assets, today),
        }))
    }

    /// Overview page: positions, allocation, dividends and patrimony evolution.
    pub async fn overview(&self) -> Result<Option<OverviewView>, CoreError> {
        let ticket = self.store.ticket()?;
        let (positions, dividends, patrimony) = futures::try_join!(
            self.api.get_positions(ticket.portfolio_id),
            self.api.get_dividends(ticket.portfolio_id),
            self.api.get_patrimony_evolution(ticket.portfolio_id),
        )?;
        if !self.accept(&ticket, "overview") {
            return Ok(None);
        }

        Ok(Some(OverviewView {
            allocation: self.analytics_service.allocation_by_category(&positions),
            total_value: self.analytics_service.total_value(&positions),
            dividends_by_month: self
                .period_service
                .dividends_by_period(&dividends, Granularity::Month),
            dividends_by_year_and_category: self
                .period_service
                .dividends_by_category(&dividends, Granularity::Year)
                .into_iter()
                .map(|(period, totals)| CategoryFlowBucket { period, totals })
                .collect(),
            patrimony: self.period_service.patrimony_monthly(&patrimony),
            positions,
        }))
    }

    // ── Rebalancing ─────────────────────────────────────────────────

    /// Fetch the rebalancing hierarchy and make it the editable draft.
    pub async fn load_rebalancing(&self) -> Result<Option<RebalancingResponse>, CoreError> {
        let ticket = self.store.ticket()?;
        let fetched = self.api.get_rebalancing(ticket.portfolio_id).await?;
        if !self.accept(&ticket, "rebalancing") {
            return Ok(None);
        }

        let draft = self.recalc(&fetched);
        self.store.set_rebalancing(Some(draft.clone()));
        Ok(Some(draft))
    }

    /// Set or clear a category target (percent of the portfolio).
    pub fn set_category_target(
        &self,
        category_id: i64,
        target_pct: Option<f64>,
    ) -> Result<RebalancingResponse, CoreError> {
        let draft = self.draft()?;
        let total = self.effective_total(&draft);
        let next = self
            .rebalancing_service
            .set_category_target(&draft, category_id, target_pct, total)?;
        self.store.set_rebalancing(Some(next.clone()));
        Ok(next)
    }

    /// Set or clear an asset target (percent of its category).
    pub fn set_asset_target(
        &self,
        category_id: i64,
        asset_id: i64,
        target_pct_in_category: Option<f64>,
    ) -> Result<RebalancingResponse, CoreError> {
        let draft = self.draft()?;
        let total = self.effective_total(&draft);
        let next = self.rebalancing_service.set_asset_target(
            &draft,
            category_id,
            asset_id,
            target_pct_in_category,
            total,
        )?;
        self.store.set_rebalancing(Some(next.clone()));
        Ok(next)
    }

    /// Set the what-if contribution and recompute the draft, if one is loaded.
    pub fn set_contribution(
        &self,
        contribution: Option<f64>,
    ) -> Result<Option<RebalancingResponse>, CoreError> {
        if let Some(amount) = contribution {
            if !amount.is_finite() {
                return Err(CoreError::Validation(format!(
                    "contribution must be a finite amount, got {amount}"
                )));
            }
        }
        self.store.set_contribution(contribution);

        let Some(draft) = self.store.rebalancing() else {
            return Ok(None);
        };
        let next = self.recalc(&draft);
        self.store.set_rebalancing(Some(next.clone()));
        Ok(Some(next))
    }

    /// Submit the edited hierarchy and bump the refresh key.
    pub async fn save_rebalancing(&self) -> Result<RebalancingResponse, CoreError> {
        let ticket = self.store.ticket()?;
        let draft = self.draft()?;

        let saved = self.api.put_rebalancing(ticket.portfolio_id, &draft).await?;
        tracing::info!(
            portfolio_id = ticket.portfolio_id,
            categories = saved.categories.len(),
            "rebalancing targets saved"
        );

        let saved = self.recalc(&saved);
        if self.store.is_current(&ticket) {
            self.store.set_rebalancing(Some(saved.clone()));
            self.store.bump_refresh();
        }
        Ok(saved)
    }

    // ── Internal ────────────────────────────────────────────────────

    fn accept(&self, ticket: &FetchTicket, view: &str) -> bool {
        let current = self.store.is_current(ticket);
        if !current {
            tracing::warn!(
                view,
                portfolio_id = ticket.portfolio_id,
                refresh_key = ticket.refresh_key,
                "discarding stale response"
            );
        }
        current
    }

    fn draft(&self) -> Result<RebalancingResponse, CoreError> {
        self.store
            .rebalancing()
            .ok_or_else(|| CoreError::NotFound("rebalancing not loaded".to_string()))
    }

    fn effective_total(&self, state: &RebalancingResponse) -> f64 {
        self.rebalancing_service
            .effective_total(state.total_value, self.store.contribution())
    }

    fn recalc(&self, state: &RebalancingResponse) -> RebalancingResponse {
        let total = self.effective_total(state);
        self.rebalancing_service.recalc_all_diffs(state, total)
    }
}
