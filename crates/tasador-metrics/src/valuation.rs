//! End-to-end valuation of one ticker: ratios, scores, composite.

use crate::{
    derived::{MetricCalculator, ValuationInputs},
    scoring::{OverallRating, ScoredMetric, ScoringPolicy},
};
use serde::Serialize;
use tasador_traits::{Result, TasadorError, normalize_symbol};
use tracing::{debug, info};

/// Scored valuation of one ticker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuationResult {
    /// Uppercased ticker.
    pub ticker: String,
    /// Company long name.
    pub company_name: String,
    /// Every metric, in [`crate::MetricId::ALL`] order.
    pub metrics: Vec<ScoredMetric>,
    /// Mean score over valid metrics, in `[0, 5]`.
    pub final_score: f64,
    /// Rating of `final_score`.
    pub overall_rating: OverallRating,
}

impl ValuationResult {
    /// Number of metrics that contributed to the composite.
    #[must_use]
    pub fn valid_metrics(&self) -> usize {
        self.metrics.iter().filter(|metric| metric.valid).count()
    }
}

/// Runs the calculator and scores the result under a policy.
#[derive(Debug, Clone, Default)]
pub struct Valuator {
    calculator: MetricCalculator,
    policy: ScoringPolicy,
}

impl Valuator {
    /// Create a valuator.
    #[must_use]
    pub const fn new(calculator: MetricCalculator, policy: ScoringPolicy) -> Self {
        Self { calculator, policy }
    }

    /// The metric calculator.
    #[must_use]
    pub const fn calculator(&self) -> &MetricCalculator {
        &self.calculator
    }

    /// The scoring policy.
    #[must_use]
    pub const fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Value one ticker.
    ///
    /// The result and any error carry `ticker` normalized, whatever symbol
    /// the company record holds.
    ///
    /// # Errors
    ///
    /// Returns [`TasadorError::SymbolNotFound`] when the company record does
    /// not confirm a listing (no long name, or quote type `NONE`). Nothing is
    /// computed in that case. Missing statement data never fails; affected
    /// metrics are reported as `N/A`.
    pub fn evaluate(&self, ticker: &str, inputs: &ValuationInputs<'_>) -> Result<ValuationResult> {
        let company = inputs.company;
        let ticker = normalize_symbol(ticker);
        if !company.confirms_listing() {
            return Err(TasadorError::SymbolNotFound(ticker));
        }

        let derived = self.calculator.compute(inputs);
        let metrics = self.policy.score_all(&derived);
        let composite = self.policy.composite(&metrics);

        for metric in &metrics {
            debug!(
                ticker = %ticker,
                metric = %metric.metric,
                value = ?metric.value,
                score = metric.score,
                "scored metric"
            );
        }
        info!(
            ticker = %ticker,
            final_score = composite.final_score,
            rating = %composite.overall_rating,
            valid = composite.valid_metrics,
            "valuation complete"
        );

        Ok(ValuationResult {
            ticker,
            company_name: company.long_name.clone().unwrap_or_default(),
            metrics,
            final_score: composite.final_score,
            overall_rating: composite.overall_rating,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{registry::MetricId, scoring::Rating};
    use approx::assert_relative_eq;
    use tasador_traits::{CompanyInfo, FinancialTable};

    fn listed() -> CompanyInfo {
        CompanyInfo {
            symbol: "acme".into(),
            long_name: Some("Acme Corp".into()),
            quote_type: Some("EQUITY".into()),
            market_cap: Some(3200.0),
            ..Default::default()
        }
    }

    fn quarterly() -> FinancialTable {
        FinancialTable::from_rows(
            &["2024-12-31", "2024-09-30", "2024-06-30", "2024-03-31"],
            vec![
                ("Operating Cash Flow", vec![Some(100.0); 4]),
                ("Capital Expenditure", vec![Some(-20.0); 4]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_unlisted_ticker_is_not_found() {
        let company = CompanyInfo {
            quote_type: Some("NONE".into()),
            ..listed()
        };
        let err = Valuator::default()
            .evaluate("acme", &ValuationInputs::company_only(&company))
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("ACME"));

        let nameless = CompanyInfo {
            long_name: None,
            ..listed()
        };
        assert!(
            Valuator::default()
                .evaluate("acme", &ValuationInputs::company_only(&nameless))
                .unwrap_err()
                .is_not_found()
        );
    }

    #[test]
    fn test_nothing_valid_is_unknown() {
        let company = CompanyInfo {
            market_cap: None,
            ..listed()
        };
        let result = Valuator::default()
            .evaluate("acme", &ValuationInputs::company_only(&company))
            .unwrap();

        assert_eq!(result.metrics.len(), MetricId::ALL.len());
        assert!(result.metrics.iter().all(|m| m.rating == Rating::NotAvailable));
        assert_relative_eq!(result.final_score, 0.0);
        assert_eq!(result.overall_rating, OverallRating::Unknown);
        assert_eq!(result.valid_metrics(), 0);
    }

    #[test]
    fn test_free_cash_flow_drives_score() {
        let company = listed();
        let cash_flow = quarterly();
        let inputs = ValuationInputs {
            quarterly_cash_flow: Some(&cash_flow),
            ..ValuationInputs::company_only(&company)
        };
        let result = Valuator::default().evaluate("acme", &inputs).unwrap();

        assert_eq!(result.ticker, "ACME");
        assert_eq!(result.company_name, "Acme Corp");
        let pfcf = &result.metrics[MetricId::PriceToFreeCashFlow.position()];
        assert_eq!(pfcf.metric, MetricId::PriceToFreeCashFlow);
        assert_relative_eq!(pfcf.value.unwrap(), 10.0);
        assert_eq!((pfcf.score, pfcf.rating), (5, Rating::VeryCheap));

        // the only valid metric is the one above
        assert_eq!(result.valid_metrics(), 1);
        assert_relative_eq!(result.final_score, 5.0);
        assert_eq!(result.overall_rating, OverallRating::Cheap);
    }

    #[test]
    fn test_mixed_composite() {
        let company = CompanyInfo {
            price_to_sales_trailing: Some(2.0),
            trailing_pe: Some(10.0),
            forward_pe: Some(20.0),
            earnings_growth: Some(-0.5),
            ..listed()
        };
        let cash_flow = quarterly();
        let income = FinancialTable::from_rows(
            &["2024-12-31"],
            vec![
                ("Total Revenue", vec![Some(1000.0)]),
                ("Cost Of Revenue", vec![Some(800.0)]),
            ],
        )
        .unwrap();
        let inputs = ValuationInputs {
            company: &company,
            quarterly_cash_flow: Some(&cash_flow),
            income_statement: Some(&income),
            revenue_estimates: None,
        };
        let result = Valuator::default().evaluate("acme", &inputs).unwrap();

        let scores: Vec<u8> = result.metrics.iter().map(|m| m.score).collect();
        // P/S 2 -> 5, F P/S n/a, P/GP 16 -> 1, P/E 10 -> 5, F P/E 20 -> 3,
        // P/FCF 10 -> 5, F P/FCF 3200/160 = 20 -> 3
        assert_eq!(scores, vec![5, 0, 1, 5, 3, 5, 3]);
        assert_eq!(result.valid_metrics(), 6);
        assert_relative_eq!(result.final_score, 22.0 / 6.0);
        assert_eq!(result.overall_rating, OverallRating::FairPrice);
    }

    #[test]
    fn test_ticker_comes_from_request() {
        let company = CompanyInfo {
            symbol: String::new(),
            ..listed()
        };
        let result = Valuator::default()
            .evaluate(" acme ", &ValuationInputs::company_only(&company))
            .unwrap();
        assert_eq!(result.ticker, "ACME");

        let unlisted = CompanyInfo {
            symbol: String::new(),
            long_name: None,
            ..listed()
        };
        let err = Valuator::default()
            .evaluate("acme", &ValuationInputs::company_only(&unlisted))
            .unwrap_err();
        assert!(err.to_string().contains("ACME"));
    }
}
