//! Metric registry for discovering and describing the valuation ratios.
//!
//! [`MetricId::ALL`] fixes the order metrics appear in every valuation result;
//! consumers may rely on position corresponding to metric identity.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Identifier of a valuation ratio.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MetricId {
    /// Trailing price to sales.
    #[display("Price to Sales (P/S)")]
    PriceToSales,
    /// Market cap over next-fiscal-year consensus revenue.
    #[display("Forward Price to Sales (F P/S)")]
    ForwardPriceToSales,
    /// Market cap over latest gross profit.
    #[display("Price to Gross Profit (P/GP)")]
    PriceToGrossProfit,
    /// Trailing price to earnings.
    #[display("Price to Earnings (P/E)")]
    PriceToEarnings,
    /// Forward price to earnings.
    #[display("Forward Price to Earnings (F P/E)")]
    ForwardPriceToEarnings,
    /// Market cap over trailing twelve month free cash flow.
    #[display("Price to Free Cash Flow (P/FCF)")]
    PriceToFreeCashFlow,
    /// Market cap over growth-adjusted free cash flow.
    #[display("Forward Price to Free Cash Flow (F P/FCF)")]
    ForwardPriceToFreeCashFlow,
}

impl MetricId {
    /// Every metric, in output order.
    pub const ALL: [Self; 7] = [
        Self::PriceToSales,
        Self::ForwardPriceToSales,
        Self::PriceToGrossProfit,
        Self::PriceToEarnings,
        Self::ForwardPriceToEarnings,
        Self::PriceToFreeCashFlow,
        Self::ForwardPriceToFreeCashFlow,
    ];

    /// Stable snake_case key, as used in configuration files.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::PriceToSales => "price_to_sales",
            Self::ForwardPriceToSales => "forward_price_to_sales",
            Self::PriceToGrossProfit => "price_to_gross_profit",
            Self::PriceToEarnings => "price_to_earnings",
            Self::ForwardPriceToEarnings => "forward_price_to_earnings",
            Self::PriceToFreeCashFlow => "price_to_free_cash_flow",
            Self::ForwardPriceToFreeCashFlow => "forward_price_to_free_cash_flow",
        }
    }

    /// Whether the ratio uses trailing actuals or an estimate.
    #[must_use]
    pub const fn basis(&self) -> MetricBasis {
        match self {
            Self::PriceToSales
            | Self::PriceToGrossProfit
            | Self::PriceToEarnings
            | Self::PriceToFreeCashFlow => MetricBasis::Trailing,
            Self::ForwardPriceToSales
            | Self::ForwardPriceToEarnings
            | Self::ForwardPriceToFreeCashFlow => MetricBasis::Forward,
        }
    }

    /// Position of the metric in output order.
    #[must_use]
    pub const fn position(&self) -> usize {
        *self as usize
    }
}

/// Time basis of a ratio's denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricBasis {
    /// Reported trailing figures.
    Trailing,
    /// Forward-looking estimates.
    Forward,
}

impl MetricBasis {
    /// Get a human-readable description of the basis.
    #[must_use]
    pub const fn description(&self) -> &str {
        match self {
            Self::Trailing => "Ratios over reported trailing figures",
            Self::Forward => "Ratios over estimated forward figures",
        }
    }
}

/// Metadata about a metric.
#[derive(Debug, Clone, Serialize)]
pub struct MetricInfo {
    /// Metric identifier
    pub id: MetricId,

    /// Trailing or forward
    pub basis: MetricBasis,

    /// Human-readable description
    pub description: &'static str,

    /// Whether the ratio is computed from statements rather than passed
    /// through from the company record
    pub derived: bool,
}

/// Get information about all metrics, in output order.
#[must_use]
pub fn available_metrics() -> Vec<MetricInfo> {
    MetricId::ALL
        .iter()
        .map(|&id| MetricInfo {
            id,
            basis: id.basis(),
            description: describe(id),
            derived: !matches!(
                id,
                MetricId::PriceToSales | MetricId::PriceToEarnings | MetricId::ForwardPriceToEarnings
            ),
        })
        .collect()
}

const fn describe(id: MetricId) -> &'static str {
    match id {
        MetricId::PriceToSales => "Market cap relative to trailing twelve month revenue",
        MetricId::ForwardPriceToSales => "Market cap relative to next fiscal year consensus revenue",
        MetricId::PriceToGrossProfit => "Market cap relative to revenue less cost of revenue",
        MetricId::PriceToEarnings => "Share price relative to trailing earnings per share",
        MetricId::ForwardPriceToEarnings => "Share price relative to estimated earnings per share",
        MetricId::PriceToFreeCashFlow => {
            "Market cap relative to trailing four quarter operating cash flow less capex"
        }
        MetricId::ForwardPriceToFreeCashFlow => {
            "Market cap relative to free cash flow grown by the earnings growth estimate"
        }
    }
}

/// Get all metrics with the given basis.
#[must_use]
pub fn metrics_by_basis(basis: MetricBasis) -> Vec<MetricInfo> {
    available_metrics()
        .into_iter()
        .filter(|info| info.basis == basis)
        .collect()
}

/// Get information about a metric by key or display name.
#[must_use]
pub fn get_metric_info(name: &str) -> Option<MetricInfo> {
    available_metrics()
        .into_iter()
        .find(|info| info.id.key() == name || info.id.to_string() == name)
}
