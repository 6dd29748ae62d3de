//! FMP API client implementation.

use crate::{
    Result,
    error::FmpError,
    types::{
        AnalystEstimate, BalanceSheet, CashFlowStatement, IncomeStatement, Period, Profile,
        RatiosTtm, TreasuryRate,
    },
};
use reqwest::Client;
use std::{collections::HashMap, env, sync::Arc};
use tokio::sync::Mutex;
use tracing::debug;

/// Base URL for the FMP stable API.
const FMP_BASE_URL: &str = "https://financialmodelingprep.com/stable";

/// Financial Modeling Prep API client.
///
/// Clones share one connection pool and one set of pending estimates.
#[derive(Debug, Clone)]
pub struct FmpClient {
    client: Client,
    api_key: String,
    base_url: String,
    /// Estimates fetched with a company record, held for the next
    /// `revenue_estimates` call on the same symbol.
    pending_estimates: Arc<Mutex<HashMap<String, Vec<AnalystEstimate>>>>,
}

impl FmpClient {
    /// Create a new FMP client with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: FMP_BASE_URL.to_string(),
            pending_estimates: Arc::default(),
        }
    }

    /// Create a new FMP client from the `FMP_API_KEY` environment variable.
    ///
    /// This will also load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment variable is not set.
    pub fn from_env() -> Result<Self> {
        // Try to load .env file (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_key = env::var("FMP_API_KEY").map_err(|_| FmpError::MissingApiKey)?;

        Ok(Self::new(api_key))
    }

    /// Point the client at another deployment of the API.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build a URL with the API key.
    fn url(&self, endpoint: &str) -> String {
        let separator = if endpoint.contains('?') { '&' } else { '?' };
        format!("{}/{endpoint}{separator}apikey={}", self.base_url, self.api_key)
    }

    /// Make a GET request and parse the JSON response.
    async fn get<T: serde::de::DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        debug!(endpoint, "fmp request");
        let response = self.client.get(self.url(endpoint)).send().await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FmpError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(FmpError::Api(format!("HTTP {status}: {text}")));
        }

        let text = response.text().await?;

        // FMP reports some failures with a 200 and an error object
        if text.contains("\"Error Message\"") {
            return Err(FmpError::Api(text));
        }

        Ok(serde_json::from_str(&text)?)
    }

    async fn statements<T: serde::de::DeserializeOwned>(
        &self,
        kind: &str,
        symbol: &str,
        period: Period,
        limit: Option<u32>,
    ) -> Result<Vec<T>> {
        let limit_param = limit.map(|l| format!("&limit={l}")).unwrap_or_default();
        let endpoint = format!(
            "{kind}?symbol={}&period={}{}",
            symbol.to_uppercase(),
            period.as_str(),
            limit_param
        );
        self.get(&endpoint).await
    }

    /// Get the company profile for a symbol.
    ///
    /// # Errors
    ///
    /// Returns [`FmpError::SymbolNotFound`] when FMP answers with no profile,
    /// or an error if the API request fails.
    pub async fn profile(&self, symbol: &str) -> Result<Profile> {
        let endpoint = format!("profile?symbol={}", symbol.to_uppercase());
        let profiles: Vec<Profile> = self.get(&endpoint).await?;
        profiles
            .into_iter()
            .next()
            .ok_or_else(|| FmpError::SymbolNotFound(symbol.to_uppercase()))
    }

    /// Get trailing-twelve-month ratios for a symbol.
    ///
    /// # Errors
    ///
    /// Returns [`FmpError::NoData`] when FMP has no ratios for the symbol, or
    /// an error if the API request fails.
    pub async fn ratios_ttm(&self, symbol: &str) -> Result<RatiosTtm> {
        let endpoint = format!("ratios-ttm?symbol={}", symbol.to_uppercase());
        let ratios: Vec<RatiosTtm> = self.get(&endpoint).await?;
        ratios
            .into_iter()
            .next()
            .ok_or_else(|| FmpError::NoData(format!("TTM ratios for {}", symbol.to_uppercase())))
    }

    /// Get income statements for a symbol.
    ///
    /// # Arguments
    ///
    /// * `symbol` - Stock ticker symbol (e.g., "AAPL")
    /// * `period` - Annual or quarterly
    /// * `limit` - Number of periods to return (most recent first)
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn income_statement(
        &self,
        symbol: &str,
        period: Period,
        limit: Option<u32>,
    ) -> Result<Vec<IncomeStatement>> {
        self.statements("income-statement", symbol, period, limit).await
    }

    /// Get balance sheets for a symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn balance_sheet(
        &self,
        symbol: &str,
        period: Period,
        limit: Option<u32>,
    ) -> Result<Vec<BalanceSheet>> {
        self.statements("balance-sheet-statement", symbol, period, limit)
            .await
    }

    /// Get cash flow statements for a symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn cash_flow(
        &self,
        symbol: &str,
        period: Period,
        limit: Option<u32>,
    ) -> Result<Vec<CashFlowStatement>> {
        self.statements("cash-flow-statement", symbol, period, limit)
            .await
    }

    /// Get consensus analyst estimates for a symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn analyst_estimates(
        &self,
        symbol: &str,
        period: Period,
        limit: Option<u32>,
    ) -> Result<Vec<AnalystEstimate>> {
        self.statements("analyst-estimates", symbol, period, limit)
            .await
    }

    /// Hold estimates for a later [`FmpClient::take_estimates`] on `symbol`.
    pub(crate) async fn remember_estimates(&self, symbol: &str, estimates: Vec<AnalystEstimate>) {
        self.pending_estimates
            .lock()
            .await
            .insert(symbol.to_uppercase(), estimates);
    }

    /// Estimates held for `symbol`, handed out at most once.
    pub(crate) async fn take_estimates(&self, symbol: &str) -> Option<Vec<AnalystEstimate>> {
        self.pending_estimates
            .lock()
            .await
            .remove(&symbol.to_uppercase())
    }

    /// Get recent US treasury yield curves, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn treasury_rates(&self) -> Result<Vec<TreasuryRate>> {
        self.get("treasury-rates").await
    }
}
