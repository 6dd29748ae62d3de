//! Valuation service: fetch, compute, cache.

use crate::{
    cache::TtlCache,
    clock::{Clock, SystemClock},
    config::ServiceConfig,
};
use tasador_metrics::{MetricCalculator, StockSnapshot, ValuationInputs, ValuationResult, Valuator};
use tasador_traits::{MarketDataProvider, Result, TasadorError, normalize_symbol};
use tracing::{debug, info, warn};

/// Ties a market-data provider to the valuation engine and the caches.
#[derive(Debug)]
pub struct ValuationService<P, C = SystemClock> {
    provider: P,
    config: ServiceConfig,
    valuator: Valuator,
    valuations: TtlCache<ValuationResult, C>,
    snapshots: TtlCache<StockSnapshot, C>,
}

impl<P: MarketDataProvider> ValuationService<P, SystemClock> {
    /// Service on wall-clock time.
    #[must_use]
    pub fn new(provider: P, config: ServiceConfig) -> Self {
        Self::with_clock(provider, config, SystemClock)
    }
}

impl<P: MarketDataProvider, C: Clock + Clone> ValuationService<P, C> {
    /// Service whose caches expire on `clock`.
    #[must_use]
    pub fn with_clock(provider: P, config: ServiceConfig, clock: C) -> Self {
        let calculator = MetricCalculator::new(config.aliases.clone(), config.ttm_periods);
        Self {
            valuator: Valuator::new(calculator, config.policy.clone()),
            valuations: TtlCache::with_clock(config.cache_ttl_secs, clock.clone()),
            snapshots: TtlCache::with_clock(config.cache_ttl_secs, clock),
            provider,
            config,
        }
    }

    /// The underlying provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Active configuration.
    pub const fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Scored valuation of a ticker, served from cache while fresh.
    ///
    /// # Errors
    ///
    /// [`TasadorError::SymbolNotFound`] when the ticker is blank or the
    /// provider does not confirm a listing; [`TasadorError::Upstream`] when
    /// the company record or a statement cannot be fetched. A missing
    /// estimates table is not an error.
    pub async fn valuation(&self, ticker: &str) -> Result<ValuationResult> {
        let ticker = checked_symbol(ticker)?;
        if let Some(cached) = self.valuations.get(&ticker).await {
            debug!(ticker = %ticker, "valuation served from cache");
            return Ok(cached);
        }

        info!(ticker = %ticker, provider = self.provider.name(), "fetching valuation inputs");
        let company = self.provider.company_info(&ticker).await?;
        if !company.confirms_listing() {
            return Err(TasadorError::SymbolNotFound(ticker));
        }

        let (cash_flow, income, estimates) = tokio::join!(
            self.provider.quarterly_cash_flow(&ticker),
            self.provider.income_statement(&ticker),
            self.provider.revenue_estimates(&ticker),
        );
        let cash_flow = cash_flow?;
        let income = income?;
        let estimates = estimates
            .inspect_err(|err| warn!(ticker = %ticker, error = %err, "revenue estimates unavailable"))
            .ok()
            .flatten();

        let result = self.valuator.evaluate(
            &ticker,
            &ValuationInputs {
                company: &company,
                quarterly_cash_flow: Some(&cash_flow),
                income_statement: Some(&income),
                revenue_estimates: estimates.as_ref(),
            },
        )?;
        self.valuations.put(&ticker, result.clone()).await;
        Ok(result)
    }

    /// Headline company figures, served from cache while fresh.
    ///
    /// # Errors
    ///
    /// [`TasadorError::SymbolNotFound`] when the ticker is blank or unlisted;
    /// [`TasadorError::Upstream`] when the company record cannot be fetched.
    /// A failed cash-flow fetch only blanks the cash-flow figures.
    pub async fn snapshot(&self, ticker: &str) -> Result<StockSnapshot> {
        let ticker = checked_symbol(ticker)?;
        if let Some(cached) = self.snapshots.get(&ticker).await {
            debug!(ticker = %ticker, "snapshot served from cache");
            return Ok(cached);
        }

        info!(ticker = %ticker, provider = self.provider.name(), "fetching snapshot inputs");
        let company = self.provider.company_info(&ticker).await?;
        if !company.confirms_listing() {
            return Err(TasadorError::SymbolNotFound(ticker));
        }
        let cash_flow = self
            .provider
            .quarterly_cash_flow(&ticker)
            .await
            .inspect_err(|err| warn!(ticker = %ticker, error = %err, "cash flow unavailable"))
            .ok();

        let snapshot = StockSnapshot::build(
            &ticker,
            &company,
            cash_flow.as_ref(),
            &self.config.aliases,
            self.config.ttm_periods,
        )?;
        self.snapshots.put(&ticker, snapshot.clone()).await;
        Ok(snapshot)
    }

    /// Ten-year treasury yield as a decimal, `0.0` when unpublished.
    ///
    /// # Errors
    ///
    /// [`TasadorError::Upstream`] when the provider call fails.
    pub async fn treasury_yield(&self) -> Result<f64> {
        let yield_decimal = self.provider.ten_year_treasury_yield().await?;
        Ok(yield_decimal.filter(|y| y.is_finite()).unwrap_or(0.0))
    }
}

fn checked_symbol(raw: &str) -> Result<String> {
    let symbol = normalize_symbol(raw);
    if symbol.is_empty() {
        return Err(TasadorError::SymbolNotFound(raw.to_string()));
    }
    Ok(symbol)
}
