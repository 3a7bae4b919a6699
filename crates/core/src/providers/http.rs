use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use super::traits::PortfolioApi;
use crate::errors::CoreError;
use crate::models::dividend::Dividend;
use crate::models::patrimony::PatrimonyEntry;
use crate::models::position::PortfolioPositionEntry;
use crate::models::rebalancing::RebalancingResponse;
use crate::models::series::{NamedSeries, PortfolioReturns};
use crate::models::settings::ApiSettings;

/// REST client for the Carteira API.
///
/// - **Auth**: bearer token from [`ApiSettings::token`], when set.
/// - **Failure**: no retry, no backoff. Non-2xx responses become
///   [`CoreError::Api`] and the caller decides what to show.
pub struct HttpPortfolioApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpPortfolioApi {
    pub fn new(settings: &ApiSettings) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(settings.timeout_secs));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            token: settings.token.clone(),
        }
    }

    /// Absolute URL for an API path like `/portfolio/3/returns`.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.endpoint_url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        path: &str,
        builder: RequestBuilder,
    ) -> Result<T, CoreError> {
        tracing::debug!(endpoint = path, "calling portfolio API");
        let resp = builder.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            tracing::warn!(endpoint = path, status = status.as_u16(), "portfolio API request failed");
            return Err(CoreError::Api {
                endpoint: path.to_string(),
                status: status.as_u16(),
                message: if message.is_empty() {
                    status.to_string()
                } else {
                    message
                },
            });
        }

        resp.json().await.map_err(|e| {
            CoreError::Deserialization(format!("Failed to parse response of {path}: {e}"))
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, CoreError> {
        self.send_json(path, self.request(Method::GET, path)).await
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl PortfolioApi for HttpPortfolioApi {
    async fn get_positions(
        &self,
        portfolio_id: i64,
    ) -> Result<Vec<PortfolioPositionEntry>, CoreError> {
        self.get(&format!("/portfolio/{portfolio_id}/position")).await
    }

    async fn get_returns(&self, portfolio_id: i64) -> Result<PortfolioReturns, CoreError> {
        self.get(&format!("/portfolio/{portfolio_id}/returns")).await
    }

    async fn get_benchmarks(&self) -> Result<NamedSeries, CoreError> {
        self.get("/market_data/indexes/time_series").await
    }

    async fn get_patrimony_evolution(
        &self,
        portfolio_id: i64,
    ) -> Result<Vec<PatrimonyEntry>, CoreError> {
        self.get(&format!("/portfolio/{portfolio_id}/patrimony_evolution"))
            .await
    }

    async fn get_dividends(&self, portfolio_id: i64) -> Result<Vec<Dividend>, CoreError> {
        self.get(&format!("/portfolio/dividends/{portfolio_id}")).await
    }

    async fn get_rebalancing(&self, portfolio_id: i64) -> Result<RebalancingResponse, CoreError> {
        self.get(&format!("/portfolio/{portfolio_id}/rebalancing")).await
    }

    async fn put_rebalancing(
        &self,
        portfolio_id: i64,
        body: &RebalancingResponse,
    ) -> Result<RebalancingResponse, CoreError> {
        let path = format!("/portfolio/{portfolio_id}/rebalancing");
        let payload = body.without_uncategorized();
        let builder = self.request(Method::PUT, &path).json(&payload);
        self.send_json(&path, builder).await
    }
}
