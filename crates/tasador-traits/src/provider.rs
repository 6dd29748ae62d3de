//! Market-data provider contract.
//!
//! The valuation engine never performs network I/O itself. A provider fetches
//! the raw records for one ticker and hands them over as [`CompanyInfo`] and
//! [`FinancialTable`] values; everything after that is pure computation.

use crate::{CompanyInfo, FinancialTable, Result};
use std::future::Future;

/// Source of raw company and statement data.
///
/// Implementations must be thread-safe (`Send + Sync`) so one provider can be
/// shared across concurrent requests.
///
/// # Errors
///
/// Every method reports an unknown ticker as
/// [`TasadorError::SymbolNotFound`](crate::TasadorError::SymbolNotFound) and
/// any other failure (rate limiting, transport, malformed payload) as
/// [`TasadorError::Upstream`](crate::TasadorError::Upstream).
pub trait MarketDataProvider: Send + Sync {
    /// Short provider name, used in logs.
    fn name(&self) -> &str;

    /// Company-level snapshot for a normalized ticker.
    fn company_info(&self, symbol: &str) -> impl Future<Output = Result<CompanyInfo>> + Send;

    /// Quarterly cash-flow statement, most recent quarter first.
    fn quarterly_cash_flow(
        &self,
        symbol: &str,
    ) -> impl Future<Output = Result<FinancialTable>> + Send;

    /// Annual income statement, most recent fiscal year first.
    fn income_statement(&self, symbol: &str)
    -> impl Future<Output = Result<FinancialTable>> + Send;

    /// Consensus revenue estimates indexed by horizon (`"+1y"`) and estimate
    /// type (`"avg"`), or `None` when the provider has no coverage.
    fn revenue_estimates(
        &self,
        symbol: &str,
    ) -> impl Future<Output = Result<Option<FinancialTable>>> + Send;

    /// Ten-year treasury yield as a decimal (0.042 = 4.2%), if published.
    fn ten_year_treasury_yield(&self) -> impl Future<Output = Result<Option<f64>>> + Send;
}
