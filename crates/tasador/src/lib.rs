#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tasador/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # tasador
//!
//! Per-ticker equity valuation from raw financial statements.
//!
//! tasador is an umbrella crate that re-exports the tasador sub-crates and adds
//! the service layer: a time-bounded cache, configuration, and the response
//! payloads served at the boundary.
//!
//! ## Quick Start
//!
//! ```ignore
//! use tasador::{ServiceConfig, ValuationService, ValuationPayload};
//! use tasador::fmp::FmpClient;
//!
//! # async fn run() -> tasador::Result<()> {
//! let service = ValuationService::new(FmpClient::from_env()?, ServiceConfig::load(None)?);
//! let result = service.valuation("aapl").await?;
//! println!("{}", serde_json::to_string(&ValuationPayload::from(&result)).unwrap());
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Organization
//!
//! - [`traits`] - Error type, tables, company record, provider trait
//! - [`metrics`] - Field resolution, derived ratios, scoring
//! - [`fmp`] - Financial Modeling Prep provider
//! - [`cache`], [`clock`], [`config`], [`report`], [`service`] - Service layer

pub mod cache;
pub mod clock;
pub mod config;
pub mod report;
pub mod service;

/// Re-export of core types and the provider trait.
pub use tasador_traits as traits;

/// Re-export of the valuation engine.
pub use tasador_metrics as metrics;

/// Re-export of the FMP provider.
pub use tasador_fmp as fmp;

pub use cache::{CacheEntry, DEFAULT_TTL_SECS, TtlCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::ServiceConfig;
pub use report::{MetricPayload, SnapshotPayload, TreasuryPayload, ValuationPayload, format_value};
pub use service::ValuationService;
pub use tasador_metrics::{
    MetricId, OverallRating, Rating, ScoringPolicy, StockSnapshot, ValuationResult, Valuator,
};
pub use tasador_traits::{
    CompanyInfo, FinancialTable, MarketDataProvider, Result, TasadorError, normalize_symbol,
};
