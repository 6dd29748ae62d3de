//! Snapshot command implementation.

use crate::OutputFormat;
use anyhow::Result;
use tasador::{MarketDataProvider, SnapshotPayload, ValuationService};

/// Print headline figures for a ticker.
pub(crate) async fn show_snapshot<P: MarketDataProvider>(
    service: &ValuationService<P>,
    ticker: &str,
    format: OutputFormat,
) -> Result<()> {
    let snapshot = service.snapshot(ticker).await?;
    let payload = SnapshotPayload::from(&snapshot);

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("\n{} ({})", payload.name, payload.ticker);
    println!("{}", "─".repeat(40));
    let rows = [
        ("Revenue (TTM)", payload.revenue),
        ("Market cap", payload.market_cap),
        ("Free cash flow", payload.fcf),
        ("Capex", payload.capex),
        ("FCF to equity", payload.fcfe),
        ("Total debt", payload.total_debt),
        ("Total cash", payload.total_cash),
        ("Shares outstanding", payload.shares_outstanding),
    ];
    for (label, value) in rows {
        println!("{label:<20} {value:>18.0}");
    }
    println!("{:<20} {:>18.2}", "Beta", payload.beta);
    println!();

    Ok(())
}
