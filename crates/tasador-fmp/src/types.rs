//! Data types for FMP API responses.
//!
//! Statement figures are `Option<f64>`: FMP sends `null` for line items a
//! filer does not report, and those must stay distinguishable from zero.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Reporting period for financial statements and estimates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    /// Annual reports (10-K filings).
    #[default]
    Annual,
    /// Quarterly reports (10-Q filings).
    Quarter,
}

impl Period {
    /// Get the API parameter value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Annual => "annual",
            Self::Quarter => "quarter",
        }
    }
}

fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Company profile from FMP.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    /// Ticker symbol.
    pub symbol: String,
    /// Registered company name.
    pub company_name: Option<String>,
    /// Last price.
    pub price: Option<f64>,
    /// Market capitalization.
    pub market_cap: Option<f64>,
    /// Beta against the market.
    pub beta: Option<f64>,
    /// Whether the symbol is an exchange traded fund.
    pub is_etf: bool,
    /// Whether the symbol is a mutual fund.
    pub is_fund: bool,
}

impl Profile {
    /// Instrument type in the provider-neutral vocabulary.
    #[must_use]
    pub const fn quote_type(&self) -> &'static str {
        if self.is_etf {
            "ETF"
        } else if self.is_fund {
            "MUTUALFUND"
        } else {
            "EQUITY"
        }
    }
}

/// Trailing-twelve-month valuation ratios from FMP.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RatiosTtm {
    /// Ticker symbol.
    pub symbol: String,
    /// Price to earnings.
    #[serde(rename = "priceToEarningsRatioTTM")]
    pub price_to_earnings: Option<f64>,
    /// Price to sales.
    #[serde(rename = "priceToSalesRatioTTM")]
    pub price_to_sales: Option<f64>,
}

/// Income statement data from FMP.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeStatement {
    /// Fiscal period end.
    pub date: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Reporting period label (`FY`, `Q1`, ...).
    #[serde(default)]
    pub period: String,
    /// Total revenue.
    #[serde(default)]
    pub revenue: Option<f64>,
    /// Cost of revenue (COGS).
    #[serde(default)]
    pub cost_of_revenue: Option<f64>,
    /// Gross profit.
    #[serde(default)]
    pub gross_profit: Option<f64>,
    /// Operating income.
    #[serde(default)]
    pub operating_income: Option<f64>,
    /// Net income.
    #[serde(default)]
    pub net_income: Option<f64>,
    /// Earnings per share (basic).
    #[serde(default)]
    pub eps: Option<f64>,
    /// Earnings per share (diluted).
    #[serde(default)]
    pub eps_diluted: Option<f64>,
    /// Weighted average shares outstanding.
    #[serde(default)]
    pub weighted_average_shs_out: Option<f64>,
}

impl IncomeStatement {
    /// Diluted EPS, falling back to basic.
    #[must_use]
    pub fn earnings_per_share(&self) -> Option<f64> {
        self.eps_diluted.or(self.eps)
    }
}

/// Balance sheet data from FMP.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSheet {
    /// Fiscal period end.
    pub date: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Reporting period label.
    #[serde(default)]
    pub period: String,
    /// Cash and cash equivalents.
    #[serde(default)]
    pub cash_and_cash_equivalents: Option<f64>,
    /// Cash plus short-term investments.
    #[serde(default)]
    pub cash_and_short_term_investments: Option<f64>,
    /// Total debt.
    #[serde(default)]
    pub total_debt: Option<f64>,
}

impl BalanceSheet {
    /// Cash including short-term investments where reported.
    #[must_use]
    pub fn total_cash(&self) -> Option<f64> {
        self.cash_and_short_term_investments
            .or(self.cash_and_cash_equivalents)
    }
}

/// Cash flow statement data from FMP.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowStatement {
    /// Fiscal period end.
    pub date: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Reporting period label.
    #[serde(default)]
    pub period: String,
    /// Operating cash flow.
    #[serde(default)]
    pub operating_cash_flow: Option<f64>,
    /// Capital expenditure (reported negative).
    #[serde(default)]
    pub capital_expenditure: Option<f64>,
    /// Free cash flow as computed by FMP.
    #[serde(default)]
    pub free_cash_flow: Option<f64>,
}

/// Consensus analyst estimates for one fiscal period.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalystEstimate {
    /// Ticker symbol.
    pub symbol: String,
    /// Fiscal period end the estimate refers to.
    pub date: String,
    /// Lowest revenue estimate.
    #[serde(default)]
    pub revenue_low: Option<f64>,
    /// Highest revenue estimate.
    #[serde(default)]
    pub revenue_high: Option<f64>,
    /// Average revenue estimate.
    #[serde(default)]
    pub revenue_avg: Option<f64>,
    /// Average EPS estimate.
    #[serde(default)]
    pub eps_avg: Option<f64>,
}

impl AnalystEstimate {
    /// Parse the date string into a NaiveDate.
    #[must_use]
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }
}

/// US treasury par yield curve for one day, in percent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreasuryRate {
    /// Observation date.
    pub date: String,
    /// Ten-year yield.
    #[serde(default)]
    pub year10: Option<f64>,
}
