//! Valuation command implementation.

use crate::OutputFormat;
use anyhow::Result;
use tasador::{MarketDataProvider, ValuationPayload, ValuationService};

/// Score a ticker and print the result.
pub(crate) async fn show_valuation<P: MarketDataProvider>(
    service: &ValuationService<P>,
    ticker: &str,
    format: OutputFormat,
) -> Result<()> {
    let result = service.valuation(ticker).await?;
    let payload = ValuationPayload::from(&result);

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                      Valuation Scores                        ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("Ticker:  {}", payload.ticker);
    println!("Company: {}", payload.company_name);
    println!();

    println!("{:<44} {:>10} {:>6}  {}", "Metric", "Value", "Score", "Rating");
    println!("{}", "─".repeat(76));
    for metric in &payload.metrics {
        println!(
            "{:<44} {:>10} {:>6}  {}",
            metric.metric, metric.value, metric.score, metric.rating
        );
    }
    println!("{}", "─".repeat(76));
    println!();

    println!(
        "Final score: {} / 5 ({} of {} metrics scored)",
        payload.final_score,
        result.valid_metrics(),
        result.metrics.len()
    );
    println!("Overall:     {}", payload.overall_rating);
    println!();

    Ok(())
}
