//! [`MarketDataProvider`] backed by the FMP API.

use crate::{
    client::FmpClient,
    convert::{self, CompanyPayload},
    error::FmpError,
    types::Period,
};
use chrono::Utc;
use tasador_traits::{CompanyInfo, FinancialTable, MarketDataProvider, Result, normalize_symbol};
use tracing::{info, warn};

/// Quarters fetched for trailing sums and year-over-year growth.
const QUARTERS: u32 = 8;
/// Fiscal years of income statement history.
const ANNUAL_YEARS: u32 = 5;
/// Annual estimate rows requested; spans past and future fiscal years.
const ESTIMATE_YEARS: u32 = 10;

impl FmpClient {
    async fn company_payload(&self, symbol: &str) -> std::result::Result<CompanyPayload, FmpError> {
        let profile = self.profile(symbol).await?;
        if profile.company_name.as_deref().is_none_or(|name| name.trim().is_empty()) {
            return Err(FmpError::SymbolNotFound(symbol.to_string()));
        }

        let (ratios, income, balance, estimates) = tokio::join!(
            self.ratios_ttm(symbol),
            self.income_statement(symbol, Period::Quarter, Some(QUARTERS)),
            self.balance_sheet(symbol, Period::Quarter, Some(1)),
            self.analyst_estimates(symbol, Period::Annual, Some(ESTIMATE_YEARS)),
        );

        let estimates = degrade(symbol, "analyst estimates", estimates);
        if let Some(estimates) = &estimates {
            self.remember_estimates(symbol, estimates.clone()).await;
        }

        Ok(CompanyPayload {
            profile,
            ratios: degrade(symbol, "ratios-ttm", ratios),
            quarterly_income: degrade(symbol, "quarterly income", income).unwrap_or_default(),
            balance_sheet: degrade(symbol, "balance sheet", balance)
                .and_then(|sheets| sheets.into_iter().next()),
            estimates: estimates.unwrap_or_default(),
        })
    }
}

/// Secondary endpoints only enrich the record; a failure there is logged and
/// the figure left absent.
fn degrade<T>(symbol: &str, what: &str, result: std::result::Result<T, FmpError>) -> Option<T> {
    result
        .inspect_err(|err| warn!(symbol, endpoint = what, error = %err, "fmp data unavailable"))
        .ok()
}

impl MarketDataProvider for FmpClient {
    fn name(&self) -> &str {
        "fmp"
    }

    async fn company_info(&self, symbol: &str) -> Result<CompanyInfo> {
        let symbol = normalize_symbol(symbol);
        info!(symbol = %symbol, "fetching company info");
        let payload = self.company_payload(&symbol).await?;
        Ok(convert::company_info(&symbol, &payload, Utc::now().date_naive()))
    }

    async fn quarterly_cash_flow(&self, symbol: &str) -> Result<FinancialTable> {
        let statements = self
            .cash_flow(symbol, Period::Quarter, Some(QUARTERS))
            .await?;
        convert::statement_table(&statements)
    }

    async fn income_statement(&self, symbol: &str) -> Result<FinancialTable> {
        let statements =
            FmpClient::income_statement(self, symbol, Period::Annual, Some(ANNUAL_YEARS)).await?;
        convert::statement_table(&statements)
    }

    async fn revenue_estimates(&self, symbol: &str) -> Result<Option<FinancialTable>> {
        let estimates = match self.take_estimates(symbol).await {
            Some(estimates) => estimates,
            None => {
                self.analyst_estimates(symbol, Period::Annual, Some(ESTIMATE_YEARS))
                    .await?
            }
        };
        convert::revenue_estimates_table(&estimates, Utc::now().date_naive())
    }

    async fn ten_year_treasury_yield(&self) -> Result<Option<f64>> {
        let rates = self.treasury_rates().await?;
        Ok(convert::ten_year_yield(&rates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AnalystEstimate;

    fn estimate(date: &str, avg: f64) -> AnalystEstimate {
        AnalystEstimate {
            symbol: "ACME".into(),
            date: date.into(),
            revenue_low: None,
            revenue_high: None,
            revenue_avg: Some(avg),
            eps_avg: None,
        }
    }

    #[tokio::test]
    async fn test_estimates_from_company_fetch_are_reused_once() {
        // nothing listens here, so any request fails
        let client = FmpClient::new("k").with_base_url("http://127.0.0.1:9");
        client
            .remember_estimates(
                "ACME",
                vec![estimate("2100-12-31", 1_000.0), estimate("2101-12-31", 1_200.0)],
            )
            .await;

        let table = client.revenue_estimates("acme").await.unwrap().unwrap();
        assert_eq!(table.value(convert::NEXT_YEAR, "avg"), Some(1_200.0));

        assert!(client.take_estimates("ACME").await.is_none());
        assert!(client.revenue_estimates("ACME").await.is_err());
    }
}
