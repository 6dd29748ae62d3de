//! Treasury yield command implementation.

use crate::OutputFormat;
use anyhow::Result;
use tasador::{MarketDataProvider, TreasuryPayload, ValuationService};

/// Print the ten-year treasury yield.
pub(crate) async fn show_treasury<P: MarketDataProvider>(
    service: &ValuationService<P>,
    format: OutputFormat,
) -> Result<()> {
    let payload = TreasuryPayload {
        yield_decimal: service.treasury_yield().await?,
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&payload)?),
        OutputFormat::Text => {
            println!("10Y treasury yield: {:.2}%", payload.yield_decimal * 100.0);
        }
    }
    Ok(())
}
