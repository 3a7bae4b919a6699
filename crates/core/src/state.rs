use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::models::period::RangeKey;
use crate::models::rebalancing::RebalancingResponse;

/// Application state shared by every view.
///
/// Passed around explicitly through [`AppStore`]; derivation code never
/// reaches for it on its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    /// Portfolio selected by the user
    pub portfolio_id: Option<i64>,

    /// Bumped after every mutation so views know to refetch
    pub refresh_key: u64,

    /// Chart range shared by the returns views
    pub range: RangeKey,

    /// What-if amount added to the portfolio total when rebalancing
    pub contribution: Option<f64>,

    /// Rebalancing hierarchy being edited, if loaded
    pub rebalancing: Option<RebalancingResponse>,
}

/// Snapshot of the inputs a fetch was issued for.
///
/// A response is applied only if the store still matches its ticket;
/// otherwise the user moved on (switched portfolio, saved something) and the
/// late response is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub portfolio_id: i64,
    pub refresh_key: u64,
}

/// Cloneable handle to the shared [`AppState`].
#[derive(Debug, Clone, Default)]
pub struct AppStore {
    inner: Arc<RwLock<AppState>>,
}

impl AppStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_portfolio(portfolio_id: i64) -> Self {
        let store = Self::new();
        store.select_portfolio(portfolio_id);
        store
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> AppState {
        self.read().clone()
    }

    /// Switch portfolio. Drops the rebalancing draft of the previous one.
    pub fn select_portfolio(&self, portfolio_id: i64) {
        let mut state = self.write();
        if state.portfolio_id != Some(portfolio_id) {
            state.portfolio_id = Some(portfolio_id);
            state.rebalancing = None;
        }
    }

    /// Mark data as changed so every open view refetches.
    pub fn bump_refresh(&self) -> u64 {
        let mut state = self.write();
        state.refresh_key = state.refresh_key.wrapping_add(1);
        state.refresh_key
    }

    pub fn set_range(&self, range: RangeKey) {
        self.write().range = range;
    }

    pub fn range(&self) -> RangeKey {
        self.read().range
    }

    pub fn contribution(&self) -> Option<f64> {
        self.read().contribution
    }

    pub(crate) fn set_contribution(&self, contribution: Option<f64>) {
        self.write().contribution = contribution;
    }

    pub fn rebalancing(&self) -> Option<RebalancingResponse> {
        self.read().rebalancing.clone()
    }

    pub(crate) fn set_rebalancing(&self, rebalancing: Option<RebalancingResponse>) {
        self.write().rebalancing = rebalancing;
    }

    /// Ticket for a fetch about to be issued.
    pub fn ticket(&self) -> Result<FetchTicket, CoreError> {
        let state = self.read();
        let portfolio_id = state
            .portfolio_id
            .ok_or_else(|| CoreError::Validation("no portfolio selected".to_string()))?;
        Ok(FetchTicket {
            portfolio_id,
            refresh_key: state.refresh_key,
        })
    }

    /// Whether a response fetched under `ticket` may still be applied.
    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        let state = self.read();
        state.portfolio_id == Some(ticket.portfolio_id) && state.refresh_key == ticket.refresh_key
    }

    fn read(&self) -> RwLockReadGuard<'_, AppState> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, AppState> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}
