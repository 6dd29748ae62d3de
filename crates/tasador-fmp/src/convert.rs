//! Conversion of FMP payloads into provider-neutral records.
//!
//! Statement rows are relabelled with the line-item names the valuation
//! engine's default alias table expects, so no FMP-specific aliases are needed.

use crate::types::{
    AnalystEstimate, BalanceSheet, CashFlowStatement, IncomeStatement, Profile, RatiosTtm,
    TreasuryRate,
};
use chrono::NaiveDate;
use tasador_traits::{CompanyInfo, FinancialTable, Result, normalize_symbol};

/// Row label of the current fiscal year estimate.
pub const CURRENT_YEAR: &str = "0y";
/// Row label of the next fiscal year estimate.
pub const NEXT_YEAR: &str = "+1y";

/// Quarters in a trailing year.
const TTM_QUARTERS: usize = 4;

/// A dated statement whose line items map onto table rows.
pub trait StatementRows {
    /// Fiscal period end, `YYYY-MM-DD`.
    fn date(&self) -> &str;

    /// `(label, value)` pairs in row order.
    fn line_items(&self) -> Vec<(&'static str, Option<f64>)>;
}

impl StatementRows for IncomeStatement {
    fn date(&self) -> &str {
        &self.date
    }

    fn line_items(&self) -> Vec<(&'static str, Option<f64>)> {
        vec![
            ("Total Revenue", self.revenue),
            ("Cost Of Revenue", self.cost_of_revenue),
            ("Gross Profit", self.gross_profit),
            ("Operating Income", self.operating_income),
            ("Net Income", self.net_income),
            ("Diluted EPS", self.earnings_per_share()),
        ]
    }
}

impl StatementRows for CashFlowStatement {
    fn date(&self) -> &str {
        &self.date
    }

    fn line_items(&self) -> Vec<(&'static str, Option<f64>)> {
        vec![
            ("Operating Cash Flow", self.operating_cash_flow),
            ("Capital Expenditure", self.capital_expenditure),
            ("Free Cash Flow", self.free_cash_flow),
        ]
    }
}

/// Pivot dated statements into a table with one column per period.
///
/// Periods are ordered most recent first regardless of response order. When
/// several statements share a period end, the first one in the response wins.
///
/// # Errors
///
/// Propagates table construction failures.
pub fn statement_table<S: StatementRows>(statements: &[S]) -> Result<FinancialTable> {
    let mut ordered: Vec<&S> = statements.iter().collect();
    ordered.sort_by(|a, b| b.date().cmp(a.date()));
    ordered.dedup_by(|later, earlier| later.date() == earlier.date());

    let periods: Vec<&str> = ordered.iter().map(|statement| statement.date()).collect();
    let Some(first) = ordered.first() else {
        return Ok(FinancialTable::empty());
    };

    let rows = first
        .line_items()
        .into_iter()
        .enumerate()
        .map(|(index, (label, _))| {
            let values = ordered
                .iter()
                .map(|statement| statement.line_items()[index].1)
                .collect();
            (label, values)
        })
        .collect();
    FinancialTable::from_rows(&periods, rows)
}

/// Revenue estimates as a `horizon x {avg, low, high}` table.
///
/// The first fiscal period ending on or after `today` is `0y`, the next one
/// `+1y`. Returns `None` when no estimate covers the current year.
///
/// # Errors
///
/// Propagates table construction failures.
pub fn revenue_estimates_table(
    estimates: &[AnalystEstimate],
    today: NaiveDate,
) -> Result<Option<FinancialTable>> {
    let upcoming = upcoming_estimates(estimates, today);
    if upcoming.is_empty() {
        return Ok(None);
    }
    let rows = [CURRENT_YEAR, NEXT_YEAR]
        .into_iter()
        .zip(upcoming)
        .map(|(horizon, estimate)| {
            (
                horizon,
                vec![estimate.revenue_avg, estimate.revenue_low, estimate.revenue_high],
            )
        })
        .collect();
    FinancialTable::from_rows(&["avg", "low", "high"], rows).map(Some)
}

/// Next fiscal year EPS consensus, if covered.
#[must_use]
pub fn next_year_eps(estimates: &[AnalystEstimate], today: NaiveDate) -> Option<f64> {
    upcoming_estimates(estimates, today)
        .get(1)
        .and_then(|estimate| estimate.eps_avg)
}

fn upcoming_estimates(estimates: &[AnalystEstimate], today: NaiveDate) -> Vec<&AnalystEstimate> {
    let mut upcoming: Vec<(NaiveDate, &AnalystEstimate)> = estimates
        .iter()
        .filter_map(|estimate| estimate.parsed_date().map(|date| (date, estimate)))
        .filter(|(date, _)| *date >= today)
        .collect();
    upcoming.sort_by_key(|(date, _)| *date);
    upcoming.into_iter().map(|(_, estimate)| estimate).collect()
}

/// Year-over-year growth of the latest quarter's EPS.
///
/// Compares the latest quarter with the same quarter a year earlier; `None`
/// when either is missing or the base is not positive.
#[must_use]
pub fn quarterly_earnings_growth(quarters: &[IncomeStatement]) -> Option<f64> {
    let mut ordered: Vec<&IncomeStatement> = quarters.iter().collect();
    ordered.sort_by(|a, b| b.date.cmp(&a.date));
    let latest = ordered.first()?.earnings_per_share()?;
    let year_ago = ordered.get(TTM_QUARTERS)?.earnings_per_share()?;
    (year_ago > 0.0).then(|| latest / year_ago - 1.0)
}

/// Sum of the most recent four quarterly revenues that are present.
#[must_use]
pub fn trailing_revenue(quarters: &[IncomeStatement]) -> Option<f64> {
    let mut ordered: Vec<&IncomeStatement> = quarters.iter().collect();
    ordered.sort_by(|a, b| b.date.cmp(&a.date));
    let present: Vec<f64> = ordered
        .iter()
        .take(TTM_QUARTERS)
        .filter_map(|quarter| quarter.revenue)
        .collect();
    (!present.is_empty()).then(|| present.iter().sum())
}

/// Everything FMP returns about one company, before conversion.
#[derive(Debug, Clone, Default)]
pub struct CompanyPayload {
    /// Company profile.
    pub profile: Profile,
    /// Trailing ratios, when the endpoint answered.
    pub ratios: Option<RatiosTtm>,
    /// Recent quarterly income statements.
    pub quarterly_income: Vec<IncomeStatement>,
    /// Latest quarterly balance sheet.
    pub balance_sheet: Option<BalanceSheet>,
    /// Annual analyst estimates.
    pub estimates: Vec<AnalystEstimate>,
}

/// Assemble a [`CompanyInfo`] from FMP payloads.
#[must_use]
pub fn company_info(symbol: &str, payload: &CompanyPayload, today: NaiveDate) -> CompanyInfo {
    let profile = &payload.profile;
    let price = profile.price.filter(|price| *price > 0.0);
    let forward_pe = price
        .zip(next_year_eps(&payload.estimates, today).filter(|eps| *eps > 0.0))
        .map(|(price, eps)| price / eps);
    let shares_outstanding = payload
        .quarterly_income
        .iter()
        .max_by(|a, b| a.date.cmp(&b.date))
        .and_then(|quarter| quarter.weighted_average_shs_out);

    CompanyInfo {
        symbol: normalize_symbol(symbol),
        long_name: profile.company_name.clone(),
        quote_type: Some(profile.quote_type().to_string()),
        market_cap: profile.market_cap,
        total_revenue: trailing_revenue(&payload.quarterly_income),
        total_debt: payload.balance_sheet.as_ref().and_then(|sheet| sheet.total_debt),
        total_cash: payload.balance_sheet.as_ref().and_then(BalanceSheet::total_cash),
        shares_outstanding,
        beta: profile.beta,
        trailing_pe: payload.ratios.as_ref().and_then(|r| r.price_to_earnings),
        forward_pe,
        price_to_sales_trailing: payload.ratios.as_ref().and_then(|r| r.price_to_sales),
        earnings_growth: quarterly_earnings_growth(&payload.quarterly_income),
        regular_market_price: price,
        current_price: None,
    }
}

/// Latest ten-year yield as a decimal.
#[must_use]
pub fn ten_year_yield(rates: &[TreasuryRate]) -> Option<f64> {
    rates
        .iter()
        .filter(|rate| rate.year10.is_some())
        .max_by(|a, b| a.date.cmp(&b.date))
        .and_then(|rate| rate.year10)
        .map(|percent| percent / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quarter(date: &str, revenue: Option<f64>, eps: Option<f64>) -> IncomeStatement {
        IncomeStatement {
            date: date.into(),
            symbol: "ACME".into(),
            period: String::new(),
            revenue,
            cost_of_revenue: None,
            gross_profit: None,
            operating_income: None,
            net_income: None,
            eps,
            eps_diluted: None,
            weighted_average_shs_out: Some(1_000.0),
        }
    }

    fn estimate(date: &str, avg: f64, eps: f64) -> AnalystEstimate {
        AnalystEstimate {
            symbol: "ACME".into(),
            date: date.into(),
            revenue_low: Some(avg * 0.9),
            revenue_high: Some(avg * 1.1),
            revenue_avg: Some(avg),
            eps_avg: Some(eps),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    fn quarters() -> Vec<IncomeStatement> {
        vec![
            quarter("2024-03-31", Some(90.0), Some(0.8)),
            quarter("2024-12-31", Some(120.0), Some(1.2)),
            quarter("2024-09-30", Some(110.0), Some(1.1)),
            quarter("2024-06-30", None, Some(1.0)),
            quarter("2023-12-31", Some(80.0), Some(1.0)),
        ]
    }

    #[test]
    fn test_statement_table_orders_periods() {
        let flows = vec![
            CashFlowStatement {
                date: "2024-09-30".into(),
                symbol: "ACME".into(),
                period: "Q3".into(),
                operating_cash_flow: Some(90.0),
                capital_expenditure: Some(-10.0),
                free_cash_flow: Some(80.0),
            },
            CashFlowStatement {
                date: "2024-12-31".into(),
                symbol: "ACME".into(),
                period: "Q4".into(),
                operating_cash_flow: Some(100.0),
                capital_expenditure: None,
                free_cash_flow: None,
            },
        ];
        let table = statement_table(&flows).unwrap();

        assert_eq!(table.periods(), vec!["2024-12-31", "2024-09-30"]);
        assert_eq!(table.row("Operating Cash Flow").unwrap(), vec![Some(100.0), Some(90.0)]);
        assert_eq!(table.row("Capital Expenditure").unwrap(), vec![None, Some(-10.0)]);
        assert_eq!(table.period_end(0), NaiveDate::from_ymd_opt(2024, 12, 31));
    }

    #[test]
    fn test_statement_table_drops_repeated_periods() {
        let flow = |date: &str, ocf: f64| CashFlowStatement {
            date: date.into(),
            symbol: "ACME".into(),
            period: "Q4".into(),
            operating_cash_flow: Some(ocf),
            capital_expenditure: Some(-10.0),
            free_cash_flow: None,
        };
        let flows = vec![
            flow("2024-12-31", 100.0),
            flow("2024-12-31", 95.0),
            flow("2024-09-30", 90.0),
        ];
        let table = statement_table(&flows).unwrap();

        assert_eq!(table.periods(), vec!["2024-12-31", "2024-09-30"]);
        assert_eq!(table.row("Operating Cash Flow").unwrap(), vec![Some(100.0), Some(90.0)]);
    }

    #[test]
    fn test_statement_table_empty() {
        let table = statement_table::<IncomeStatement>(&[]).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_income_labels_match_default_aliases() {
        let table = statement_table(&quarters()).unwrap();
        assert!(table.has_row("Total Revenue"));
        assert!(table.has_row("Cost Of Revenue"));
        assert_eq!(table.value_at("Diluted EPS", 0), Some(1.2));
    }

    #[test]
    fn test_revenue_estimates_table() {
        let estimates = vec![
            estimate("2026-12-31", 1_300.0, 2.6),
            estimate("2024-12-31", 1_000.0, 2.0),
            estimate("2025-12-31", 1_150.0, 2.3),
        ];
        let table = revenue_estimates_table(&estimates, today()).unwrap().unwrap();

        assert_eq!(table.labels(), vec![CURRENT_YEAR, NEXT_YEAR]);
        assert_eq!(table.value(NEXT_YEAR, "avg"), Some(1_300.0));
        assert_relative_eq!(table.value(CURRENT_YEAR, "low").unwrap(), 1_035.0);
        assert_eq!(next_year_eps(&estimates, today()), Some(2.6));
    }

    #[test]
    fn test_no_upcoming_estimates() {
        let estimates = vec![estimate("2023-12-31", 900.0, 1.5)];
        assert!(revenue_estimates_table(&estimates, today()).unwrap().is_none());
        assert!(next_year_eps(&estimates, today()).is_none());
    }

    #[test]
    fn test_earnings_growth_and_revenue() {
        let growth = quarterly_earnings_growth(&quarters()).unwrap();
        assert_relative_eq!(growth, 0.2, epsilon = 1e-12);
        // the quarter with no revenue contributes nothing
        assert_relative_eq!(trailing_revenue(&quarters()).unwrap(), 320.0);
        assert!(quarterly_earnings_growth(&quarters()[..4]).is_none());
    }

    #[test]
    fn test_company_info_assembly() {
        let payload = CompanyPayload {
            profile: Profile {
                symbol: "ACME".into(),
                company_name: Some("Acme Corp".into()),
                price: Some(52.0),
                market_cap: Some(52_000.0),
                beta: Some(1.1),
                ..Default::default()
            },
            ratios: Some(RatiosTtm {
                symbol: "ACME".into(),
                price_to_earnings: Some(22.0),
                price_to_sales: Some(4.5),
            }),
            quarterly_income: quarters(),
            balance_sheet: Some(BalanceSheet {
                date: "2024-12-31".into(),
                symbol: "ACME".into(),
                period: "Q4".into(),
                cash_and_cash_equivalents: Some(10.0),
                cash_and_short_term_investments: Some(25.0),
                total_debt: Some(40.0),
            }),
            estimates: vec![estimate("2025-12-31", 1_150.0, 2.3), estimate("2026-12-31", 1_300.0, 2.6)],
        };
        let info = company_info("acme", &payload, today());

        assert!(info.confirms_listing());
        assert_eq!(info.symbol, "ACME");
        assert_eq!(info.quote_type.as_deref(), Some("EQUITY"));
        assert_eq!(info.trailing_pe, Some(22.0));
        assert_eq!(info.price_to_sales_trailing, Some(4.5));
        assert_relative_eq!(info.forward_pe.unwrap(), 20.0);
        assert_eq!(info.total_cash, Some(25.0));
        assert_eq!(info.total_debt, Some(40.0));
        assert_eq!(info.shares_outstanding, Some(1_000.0));
        assert_eq!(info.price(), Some(52.0));
    }

    #[test]
    fn test_empty_profile_is_not_listed() {
        let info = company_info("ZZZZ", &CompanyPayload::default(), today());
        assert!(!info.confirms_listing());
        assert!(info.forward_pe.is_none());
    }

    #[test]
    fn test_ten_year_yield() {
        let rates = vec![
            TreasuryRate {
                date: "2025-02-27".into(),
                year10: Some(4.29),
            },
            TreasuryRate {
                date: "2025-02-28".into(),
                year10: Some(4.21),
            },
        ];
        assert_relative_eq!(ten_year_yield(&rates).unwrap(), 0.0421);
        assert!(ten_year_yield(&[]).is_none());
    }
}
