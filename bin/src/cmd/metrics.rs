//! Metric listing command implementation.

use crate::OutputFormat;
use anyhow::{Result, bail};
use serde_json::json;
use tasador::{
    ServiceConfig,
    metrics::{
        MetricBasis,
        registry::{available_metrics, metrics_by_basis},
    },
};

/// List the valuation metrics, optionally filtered by basis.
pub(crate) fn list_metrics(
    config: &ServiceConfig,
    basis: Option<&str>,
    detailed: bool,
    format: OutputFormat,
) -> Result<()> {
    let metrics = match basis.map(str::to_lowercase).as_deref() {
        None => available_metrics(),
        Some("trailing") => metrics_by_basis(MetricBasis::Trailing),
        Some("forward") => metrics_by_basis(MetricBasis::Forward),
        Some(other) => bail!("Unknown basis '{other}'. Use 'trailing' or 'forward'."),
    };
    let policy = &config.policy;

    if format == OutputFormat::Json {
        let listing: Vec<_> = metrics
            .iter()
            .map(|info| {
                json!({
                    "key": info.id.key(),
                    "metric": info.id.to_string(),
                    "basis": info.basis,
                    "description": info.description,
                    "derived": info.derived,
                    "bands": policy.bands(info.id),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                    Valuation Metrics                         ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    for info in &metrics {
        println!("  {:<44} {}", info.id.to_string(), info.id.key());
        if detailed {
            println!("      {}", info.description);
            let bands: Vec<String> = policy
                .bands(info.id)
                .iter()
                .map(|band| format!("<{}→{}", band.upper_bound, band.score))
                .collect();
            println!("      bands: {}, otherwise 0", bands.join(", "));
        }
    }
    println!();

    println!(
        "Composite: >= {} Cheap, >= {} Fair Price, > 0 Expensive, else Unknown",
        policy.cheap_cutoff(),
        policy.fair_cutoff()
    );
    if !detailed {
        println!("Use --detailed for descriptions and threshold bands.");
    }
    println!();

    Ok(())
}
