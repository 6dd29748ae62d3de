//! Field resolution and trailing-twelve-month aggregation.
//!
//! Both operations walk an alias list in preference order and stop at the
//! first label that yields usable data, so a quantity is never counted twice
//! even when several labels are present. Absence is reported as `None` by the
//! `lookup_*` functions; [`resolve`] and [`sum_recent_periods`] collapse it to
//! `0.0` for callers that want the conservative number.

use tasador_traits::FinancialTable;
use tracing::trace;

/// Number of quarters summed for a trailing-twelve-month figure.
pub const DEFAULT_TTM_PERIODS: usize = 4;

/// Value at `period_index` of the first alias whose cell is present.
///
/// An alias whose row exists but whose cell is missing (null, NaN, or out of
/// range) does not count as a match; the next alias is tried.
pub fn lookup_value<S: AsRef<str>>(
    table: &FinancialTable,
    aliases: &[S],
    period_index: usize,
) -> Option<f64> {
    aliases.iter().find_map(|alias| {
        let value = table.value_at(alias.as_ref(), period_index)?;
        trace!(label = alias.as_ref(), period_index, value, "resolved line item");
        Some(value)
    })
}

/// Sum of the leading `num_periods` values of the first alias with data.
///
/// A row whose leading slice holds no non-zero present value is treated like
/// an unmatched label. Short rows are summed over what is available; missing
/// cells contribute nothing.
pub fn lookup_recent_sum<S: AsRef<str>>(
    table: &FinancialTable,
    aliases: &[S],
    num_periods: usize,
) -> Option<f64> {
    aliases.iter().find_map(|alias| {
        let row = table.row(alias.as_ref())?;
        let present: Vec<f64> = row.into_iter().take(num_periods).flatten().collect();
        if !present.iter().any(|value| *value != 0.0) {
            return None;
        }
        let sum = present.iter().sum::<f64>();
        trace!(
            label = alias.as_ref(),
            periods = present.len(),
            sum,
            "aggregated line item"
        );
        Some(sum)
    })
}

/// Resolve a single value, degrading to `0.0`.
///
/// Never fails: an absent table, no matching alias, a missing cell, or an
/// out-of-range period all yield `0.0`.
pub fn resolve<S: AsRef<str>>(
    table: Option<&FinancialTable>,
    aliases: &[S],
    period_index: usize,
) -> f64 {
    table
        .and_then(|table| lookup_value(table, aliases, period_index))
        .unwrap_or(0.0)
}

/// Sum the most recent `num_periods` values, degrading to `0.0`.
pub fn sum_recent_periods<S: AsRef<str>>(
    table: Option<&FinancialTable>,
    aliases: &[S],
    num_periods: usize,
) -> f64 {
    table
        .and_then(|table| lookup_recent_sum(table, aliases, num_periods))
        .unwrap_or(0.0)
}
