//! Company snapshot used for discounted cash flow inputs.

use crate::{
    fields::{AliasTable, LineItem},
    resolve::lookup_recent_sum,
};
use serde::Serialize;
use tasador_traits::{CompanyInfo, FinancialTable, Result, TasadorError, normalize_symbol};

/// Headline figures for one company. `None` marks a figure that is missing
/// or not finite.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSnapshot {
    /// Company long name.
    pub name: String,
    /// Uppercased ticker.
    pub ticker: String,
    /// Trailing total revenue as reported by the provider.
    pub revenue: Option<f64>,
    /// Market capitalization.
    pub market_cap: Option<f64>,
    /// Trailing free cash flow; requires both legs non-zero.
    pub fcf: Option<f64>,
    /// Trailing capital expenditure.
    pub capex: Option<f64>,
    /// Free cash flow to equity; requires only operating cash flow.
    pub fcfe: Option<f64>,
    /// Total debt.
    pub total_debt: Option<f64>,
    /// Total cash.
    pub total_cash: Option<f64>,
    /// Market cap over price, else the provider's share count.
    pub shares_outstanding: Option<f64>,
    /// Beta.
    pub beta: Option<f64>,
}

impl StockSnapshot {
    /// Build a snapshot of `ticker` from its company record and quarterly
    /// cash flow.
    ///
    /// # Errors
    ///
    /// Returns [`TasadorError::SymbolNotFound`] when the record does not
    /// confirm a listing.
    pub fn build(
        ticker: &str,
        company: &CompanyInfo,
        quarterly_cash_flow: Option<&FinancialTable>,
        aliases: &AliasTable,
        ttm_periods: usize,
    ) -> Result<Self> {
        let ticker = normalize_symbol(ticker);
        if !company.confirms_listing() {
            return Err(TasadorError::SymbolNotFound(ticker));
        }

        let trailing = |item| {
            quarterly_cash_flow
                .and_then(|table| lookup_recent_sum(table, aliases.aliases(item), ttm_periods))
                .filter(|value| *value != 0.0)
        };
        let ocf = trailing(LineItem::OperatingCashFlow);
        let capex = trailing(LineItem::CapitalExpenditure);

        let fcf = ocf.zip(capex).map(|(ocf, capex)| ocf + capex);
        let fcfe = ocf.map(|ocf| ocf + capex.unwrap_or(0.0));

        let market_cap = finite(company.market_cap);
        let implied_shares = match (market_cap, finite(company.price())) {
            (Some(cap), Some(price)) if cap != 0.0 && price > 0.0 => Some(cap / price),
            _ => finite(company.shares_outstanding),
        };

        Ok(Self {
            name: company.long_name.clone().unwrap_or_default(),
            ticker,
            revenue: finite(company.total_revenue),
            market_cap,
            fcf: finite(fcf),
            capex: finite(Some(capex.unwrap_or(0.0))),
            fcfe: finite(fcfe),
            total_debt: finite(company.total_debt),
            total_cash: finite(company.total_cash),
            shares_outstanding: finite(implied_shares),
            beta: finite(company.beta),
        })
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}
