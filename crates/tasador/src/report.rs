//! Response payloads.
//!
//! This is the presentation boundary: absent figures become `"N/A"` or `0`
//! here and nowhere earlier.

use serde::Serialize;
use tasador_metrics::{ScoredMetric, StockSnapshot, ValuationResult};

/// Placeholder for a value that could not be computed.
pub const NOT_AVAILABLE: &str = "N/A";

/// Two-decimal rendering, `"N/A"` for absent or non-finite values.
#[must_use]
pub fn format_value(value: Option<f64>) -> String {
    value
        .filter(|v| v.is_finite())
        .map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{v:.2}"))
}

fn or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// One scored metric as served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricPayload {
    /// Display name.
    pub metric: String,
    /// Two-decimal value or `"N/A"`.
    pub value: String,
    /// Band score.
    pub score: u8,
    /// Rating label.
    pub rating: String,
}

impl From<&ScoredMetric> for MetricPayload {
    fn from(scored: &ScoredMetric) -> Self {
        Self {
            metric: scored.metric.to_string(),
            value: format_value(scored.value),
            score: scored.score,
            rating: scored.rating.to_string(),
        }
    }
}

/// Valuation response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationPayload {
    /// Uppercased ticker.
    pub ticker: String,
    /// Company long name.
    pub company_name: String,
    /// Metrics in fixed order.
    pub metrics: Vec<MetricPayload>,
    /// Two-decimal composite score.
    pub final_score: String,
    /// Overall rating label.
    pub overall_rating: String,
}

impl From<&ValuationResult> for ValuationPayload {
    fn from(result: &ValuationResult) -> Self {
        Self {
            ticker: result.ticker.clone(),
            company_name: result.company_name.clone(),
            metrics: result.metrics.iter().map(MetricPayload::from).collect(),
            final_score: format!("{:.2}", result.final_score),
            overall_rating: result.overall_rating.to_string(),
        }
    }
}

/// Stock snapshot response; missing numbers are `0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotPayload {
    /// Company long name.
    pub name: String,
    /// Uppercased ticker.
    pub ticker: String,
    /// Trailing revenue.
    pub revenue: f64,
    /// Market capitalization.
    pub market_cap: f64,
    /// Trailing free cash flow.
    pub fcf: f64,
    /// Trailing capital expenditure.
    pub capex: f64,
    /// Free cash flow to equity.
    pub fcfe: f64,
    /// Total debt.
    pub total_debt: f64,
    /// Total cash.
    pub total_cash: f64,
    /// Shares outstanding.
    pub shares_outstanding: f64,
    /// Beta.
    pub beta: f64,
}

impl From<&StockSnapshot> for SnapshotPayload {
    fn from(snapshot: &StockSnapshot) -> Self {
        Self {
            name: snapshot.name.clone(),
            ticker: snapshot.ticker.clone(),
            revenue: or_zero(snapshot.revenue),
            market_cap: or_zero(snapshot.market_cap),
            fcf: or_zero(snapshot.fcf),
            capex: or_zero(snapshot.capex),
            fcfe: or_zero(snapshot.fcfe),
            total_debt: or_zero(snapshot.total_debt),
            total_cash: or_zero(snapshot.total_cash),
            shares_outstanding: or_zero(snapshot.shares_outstanding),
            beta: or_zero(snapshot.beta),
        }
    }
}

/// Ten-year treasury yield response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TreasuryPayload {
    /// Yield as a decimal (0.0425 = 4.25%).
    #[serde(rename = "yield")]
    pub yield_decimal: f64,
}
