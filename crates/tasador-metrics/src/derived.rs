//! Derived valuation ratios.
//!
//! Raw inputs are resolved from the statements through the alias table, then
//! combined into ratios. Every intermediate is an `Option`: `None` means the
//! quantity could not be established, which is kept distinct from a reported
//! zero until the presentation boundary.

use crate::{
    fields::{AliasTable, LineItem},
    registry::MetricId,
    resolve::{DEFAULT_TTM_PERIODS, lookup_recent_sum, lookup_value},
};
use serde::Serialize;
use tasador_traits::{CompanyInfo, FinancialTable};
use tracing::debug;

/// Estimate-table row holding next fiscal year consensus.
pub const FORWARD_HORIZON: &str = "+1y";

/// Estimate-table column holding the consensus average.
pub const CONSENSUS_COLUMN: &str = "avg";

/// Everything the calculator reads for one ticker.
#[derive(Debug, Clone, Copy)]
pub struct ValuationInputs<'a> {
    /// Company-level snapshot.
    pub company: &'a CompanyInfo,
    /// Quarterly cash-flow statement, most recent first.
    pub quarterly_cash_flow: Option<&'a FinancialTable>,
    /// Annual income statement, most recent first.
    pub income_statement: Option<&'a FinancialTable>,
    /// Revenue estimates by horizon and estimate type.
    pub revenue_estimates: Option<&'a FinancialTable>,
}

impl<'a> ValuationInputs<'a> {
    /// Inputs with only the company record; every table absent.
    #[must_use]
    pub const fn company_only(company: &'a CompanyInfo) -> Self {
        Self {
            company,
            quarterly_cash_flow: None,
            income_statement: None,
            revenue_estimates: None,
        }
    }
}

/// Intermediate quantities resolved on the way to the ratios.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedFigures {
    /// Latest-period revenue.
    pub revenue: Option<f64>,
    /// Latest-period cost of revenue.
    pub cost_of_revenue: Option<f64>,
    /// Revenue less cost of revenue, when both are non-zero.
    pub gross_profit: Option<f64>,
    /// Trailing-twelve-month operating cash flow.
    pub operating_cash_flow_ttm: Option<f64>,
    /// Trailing-twelve-month capital expenditure (usually negative).
    pub capex_ttm: Option<f64>,
    /// Operating cash flow plus capex, only when both legs resolved non-zero.
    pub free_cash_flow_ttm: Option<f64>,
    /// Positive free cash flow grown by the earnings growth estimate.
    pub forward_free_cash_flow: Option<f64>,
    /// Next fiscal year consensus revenue.
    pub forward_revenue: Option<f64>,
}

/// A ratio value with its validity for scoring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedMetric {
    /// Which ratio.
    pub metric: MetricId,
    /// The ratio, `None` when it could not be computed.
    pub value: Option<f64>,
    /// `false` when the value is absent, non-finite, zero, or negative.
    pub valid: bool,
}

impl DerivedMetric {
    /// Wraps a value, deriving its validity.
    #[must_use]
    pub fn new(metric: MetricId, value: Option<f64>) -> Self {
        Self {
            metric,
            value,
            valid: value.is_some_and(|v| v.is_finite() && v > 0.0),
        }
    }

    /// A metric that could not be computed.
    #[must_use]
    pub const fn absent(metric: MetricId) -> Self {
        Self {
            metric,
            value: None,
            valid: false,
        }
    }
}

/// Computes derived figures and the seven valuation ratios.
#[derive(Debug, Clone)]
pub struct MetricCalculator {
    aliases: AliasTable,
    ttm_periods: usize,
}

impl MetricCalculator {
    /// Create a calculator with the given alias table and TTM window.
    #[must_use]
    pub const fn new(aliases: AliasTable, ttm_periods: usize) -> Self {
        Self {
            aliases,
            ttm_periods,
        }
    }

    /// The alias table in use.
    #[must_use]
    pub const fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Number of periods summed for trailing figures.
    #[must_use]
    pub const fn ttm_periods(&self) -> usize {
        self.ttm_periods
    }

    /// Resolved intermediate quantities.
    pub fn figures(&self, inputs: &ValuationInputs<'_>) -> DerivedFigures {
        let revenue = inputs
            .income_statement
            .and_then(|table| lookup_value(table, self.aliases.aliases(LineItem::TotalRevenue), 0));
        let cost_of_revenue = inputs
            .income_statement
            .and_then(|table| lookup_value(table, self.aliases.aliases(LineItem::CostOfRevenue), 0));
        let gross_profit = match (revenue, cost_of_revenue) {
            (Some(revenue), Some(cost)) if revenue != 0.0 && cost != 0.0 => Some(revenue - cost),
            _ => None,
        };

        let operating_cash_flow_ttm = self.trailing(inputs, LineItem::OperatingCashFlow);
        let capex_ttm = self.trailing(inputs, LineItem::CapitalExpenditure);
        // both legs or nothing: a half-resolved free cash flow is suppressed
        let free_cash_flow_ttm = match (operating_cash_flow_ttm, capex_ttm) {
            (Some(ocf), Some(capex)) if ocf != 0.0 && capex != 0.0 => Some(ocf + capex),
            _ => None,
        };

        let forward_free_cash_flow = free_cash_flow_ttm
            .filter(|fcf| *fcf > 0.0)
            .zip(inputs.company.earnings_growth)
            .map(|(fcf, growth)| fcf * (1.0 + growth));

        let forward_revenue = inputs
            .revenue_estimates
            .and_then(|table| table.value(FORWARD_HORIZON, CONSENSUS_COLUMN));

        DerivedFigures {
            revenue,
            cost_of_revenue,
            gross_profit,
            operating_cash_flow_ttm,
            capex_ttm,
            free_cash_flow_ttm,
            forward_free_cash_flow,
            forward_revenue,
        }
    }

    /// All seven ratios in output order.
    pub fn compute(&self, inputs: &ValuationInputs<'_>) -> Vec<DerivedMetric> {
        if let (Some(cash_flow), Some(income)) = (inputs.quarterly_cash_flow, inputs.income_statement)
        {
            debug!(
                symbol = %inputs.company.symbol,
                cash_flow_period = ?cash_flow.period_end(0),
                income_period = ?income.period_end(0),
                "statement periods aligned by position"
            );
        }

        let figures = self.figures(inputs);
        self.metrics_from(inputs.company, &figures)
    }

    /// Ratios from already resolved figures.
    pub fn metrics_from(&self, company: &CompanyInfo, figures: &DerivedFigures) -> Vec<DerivedMetric> {
        let market_cap = company.market_cap.filter(|cap| cap.is_finite());
        MetricId::ALL
            .iter()
            .map(|&metric| {
                let value = match metric {
                    MetricId::PriceToSales => company.price_to_sales_trailing,
                    MetricId::ForwardPriceToSales => price_to(market_cap, figures.forward_revenue),
                    MetricId::PriceToGrossProfit => price_to(market_cap, figures.gross_profit),
                    MetricId::PriceToEarnings => company.trailing_pe,
                    MetricId::ForwardPriceToEarnings => company.forward_pe,
                    MetricId::PriceToFreeCashFlow => {
                        price_to(market_cap, figures.free_cash_flow_ttm)
                    }
                    MetricId::ForwardPriceToFreeCashFlow => {
                        price_to(market_cap, figures.forward_free_cash_flow)
                    }
                };
                DerivedMetric::new(metric, value)
            })
            .collect()
    }

    fn trailing(&self, inputs: &ValuationInputs<'_>, item: LineItem) -> Option<f64> {
        inputs
            .quarterly_cash_flow
            .and_then(|table| lookup_recent_sum(table, self.aliases.aliases(item), self.ttm_periods))
    }
}

impl Default for MetricCalculator {
    fn default() -> Self {
        Self::new(AliasTable::default(), DEFAULT_TTM_PERIODS)
    }
}

/// Market cap over a strictly positive denominator.
fn price_to(market_cap: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    let denominator = denominator.filter(|value| *value > 0.0)?;
    market_cap.map(|cap| cap / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn company() -> CompanyInfo {
        CompanyInfo {
            symbol: "ACME".into(),
            long_name: Some("Acme Corp".into()),
            quote_type: Some("EQUITY".into()),
            market_cap: Some(3200.0),
            price_to_sales_trailing: Some(3.5),
            trailing_pe: Some(20.0),
            forward_pe: Some(18.0),
            earnings_growth: Some(0.25),
            ..Default::default()
        }
    }

    fn cash_flow(ocf: [Option<f64>; 4], capex: [Option<f64>; 4]) -> FinancialTable {
        FinancialTable::from_rows(
            &["2024-12-31", "2024-09-30", "2024-06-30", "2024-03-31"],
            vec![
                ("Operating Cash Flow", ocf.to_vec()),
                ("Capital Expenditure", capex.to_vec()),
            ],
        )
        .unwrap()
    }

    fn income(revenue: Option<f64>, cost: Option<f64>) -> FinancialTable {
        FinancialTable::from_rows(
            &["2024-12-31"],
            vec![
                ("Total Revenue", vec![revenue]),
                ("Cost Of Revenue", vec![cost]),
            ],
        )
        .unwrap()
    }

    fn value(metrics: &[DerivedMetric], id: MetricId) -> Option<f64> {
        metrics[id.position()].value
    }

    #[test]
    fn test_free_cash_flow_and_price_ratio() {
        let info = company();
        let cf = cash_flow([Some(100.0); 4], [Some(-20.0); 4]);
        let inputs = ValuationInputs {
            quarterly_cash_flow: Some(&cf),
            ..ValuationInputs::company_only(&info)
        };
        let calculator = MetricCalculator::default();

        let figures = calculator.figures(&inputs);
        assert_relative_eq!(figures.operating_cash_flow_ttm.unwrap(), 400.0);
        assert_relative_eq!(figures.capex_ttm.unwrap(), -80.0);
        assert_relative_eq!(figures.free_cash_flow_ttm.unwrap(), 320.0);

        let metrics = calculator.compute(&inputs);
        assert_relative_eq!(value(&metrics, MetricId::PriceToFreeCashFlow).unwrap(), 10.0);
        // 320 * 1.25 = 400
        assert_relative_eq!(
            value(&metrics, MetricId::ForwardPriceToFreeCashFlow).unwrap(),
            8.0
        );
    }

    #[test]
    fn test_free_cash_flow_requires_both_legs() {
        let info = company();
        let cf = cash_flow([Some(100.0); 4], [None; 4]);
        let inputs = ValuationInputs {
            quarterly_cash_flow: Some(&cf),
            ..ValuationInputs::company_only(&info)
        };
        let calculator = MetricCalculator::default();

        let figures = calculator.figures(&inputs);
        assert_relative_eq!(figures.operating_cash_flow_ttm.unwrap(), 400.0);
        assert!(figures.capex_ttm.is_none());
        assert!(figures.free_cash_flow_ttm.is_none());

        let metrics = calculator.compute(&inputs);
        assert!(value(&metrics, MetricId::PriceToFreeCashFlow).is_none());
        assert!(value(&metrics, MetricId::ForwardPriceToFreeCashFlow).is_none());
    }

    #[test]
    fn test_negative_free_cash_flow_is_absent() {
        let info = company();
        let cf = cash_flow([Some(10.0); 4], [Some(-50.0); 4]);
        let inputs = ValuationInputs {
            quarterly_cash_flow: Some(&cf),
            ..ValuationInputs::company_only(&info)
        };
        let calculator = MetricCalculator::default();

        assert_relative_eq!(calculator.figures(&inputs).free_cash_flow_ttm.unwrap(), -160.0);
        let metrics = calculator.compute(&inputs);
        assert!(!metrics[MetricId::PriceToFreeCashFlow.position()].valid);
        assert!(value(&metrics, MetricId::PriceToFreeCashFlow).is_none());
    }

    #[test]
    fn test_forward_fcf_needs_growth_and_positive_product() {
        let mut info = company();
        info.earnings_growth = None;
        let cf = cash_flow([Some(100.0); 4], [Some(-20.0); 4]);
        let calculator = MetricCalculator::default();

        let inputs = ValuationInputs {
            quarterly_cash_flow: Some(&cf),
            ..ValuationInputs::company_only(&info)
        };
        assert!(calculator.figures(&inputs).forward_free_cash_flow.is_none());

        info.earnings_growth = Some(-1.5);
        let inputs = ValuationInputs {
            quarterly_cash_flow: Some(&cf),
            ..ValuationInputs::company_only(&info)
        };
        assert_relative_eq!(calculator.figures(&inputs).forward_free_cash_flow.unwrap(), -160.0);
        let metrics = calculator.compute(&inputs);
        assert!(value(&metrics, MetricId::ForwardPriceToFreeCashFlow).is_none());
    }

    #[test]
    fn test_gross_profit_ratio() {
        let info = company();
        let statement = income(Some(1000.0), Some(600.0));
        let inputs = ValuationInputs {
            income_statement: Some(&statement),
            ..ValuationInputs::company_only(&info)
        };
        let calculator = MetricCalculator::default();

        assert_relative_eq!(calculator.figures(&inputs).gross_profit.unwrap(), 400.0);
        let metrics = calculator.compute(&inputs);
        assert_relative_eq!(value(&metrics, MetricId::PriceToGrossProfit).unwrap(), 8.0);
    }

    #[test]
    fn test_gross_profit_needs_both_operands() {
        let info = company();
        let statement = income(Some(1000.0), None);
        let inputs = ValuationInputs {
            income_statement: Some(&statement),
            ..ValuationInputs::company_only(&info)
        };
        let calculator = MetricCalculator::default();

        assert!(calculator.figures(&inputs).gross_profit.is_none());
        assert!(value(&calculator.compute(&inputs), MetricId::PriceToGrossProfit).is_none());

        let statement = income(Some(500.0), Some(700.0));
        let inputs = ValuationInputs {
            income_statement: Some(&statement),
            ..ValuationInputs::company_only(&info)
        };
        assert_relative_eq!(calculator.figures(&inputs).gross_profit.unwrap(), -200.0);
        assert!(value(&calculator.compute(&inputs), MetricId::PriceToGrossProfit).is_none());
    }

    #[test]
    fn test_forward_price_to_sales() {
        let info = company();
        let estimates = FinancialTable::from_rows(
            &["avg", "low", "high"],
            vec![
                ("0y", vec![Some(500.0), None, None]),
                ("+1y", vec![Some(640.0), None, None]),
            ],
        )
        .unwrap();
        let inputs = ValuationInputs {
            revenue_estimates: Some(&estimates),
            ..ValuationInputs::company_only(&info)
        };
        let metrics = MetricCalculator::default().compute(&inputs);
        assert_relative_eq!(value(&metrics, MetricId::ForwardPriceToSales).unwrap(), 5.0);

        let zero = FinancialTable::from_rows(&["avg"], vec![("+1y", vec![Some(0.0)])]).unwrap();
        let inputs = ValuationInputs {
            revenue_estimates: Some(&zero),
            ..ValuationInputs::company_only(&info)
        };
        let metrics = MetricCalculator::default().compute(&inputs);
        assert!(value(&metrics, MetricId::ForwardPriceToSales).is_none());
    }

    #[test]
    fn test_pass_through_ratios() {
        let info = company();
        let metrics = MetricCalculator::default().compute(&ValuationInputs::company_only(&info));
        assert_eq!(metrics.len(), 7);
        assert_eq!(value(&metrics, MetricId::PriceToSales), Some(3.5));
        assert_eq!(value(&metrics, MetricId::PriceToEarnings), Some(20.0));
        assert_eq!(value(&metrics, MetricId::ForwardPriceToEarnings), Some(18.0));
        assert!(value(&metrics, MetricId::PriceToGrossProfit).is_none());
    }

    #[test]
    fn test_missing_market_cap_leaves_ratios_absent() {
        let mut info = company();
        info.market_cap = None;
        let cf = cash_flow([Some(100.0); 4], [Some(-20.0); 4]);
        let inputs = ValuationInputs {
            quarterly_cash_flow: Some(&cf),
            ..ValuationInputs::company_only(&info)
        };
        let metrics = MetricCalculator::default().compute(&inputs);
        assert!(value(&metrics, MetricId::PriceToFreeCashFlow).is_none());
    }

    #[test]
    fn test_derived_metric_validity() {
        assert!(DerivedMetric::new(MetricId::PriceToSales, Some(2.0)).valid);
        assert!(!DerivedMetric::new(MetricId::PriceToSales, Some(0.0)).valid);
        assert!(!DerivedMetric::new(MetricId::PriceToSales, Some(-1.0)).valid);
        assert!(!DerivedMetric::new(MetricId::PriceToSales, Some(f64::NAN)).valid);
        assert!(!DerivedMetric::absent(MetricId::PriceToSales).valid);
    }
}
