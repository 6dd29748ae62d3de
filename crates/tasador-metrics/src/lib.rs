//! Valuation metrics for tasador.
//!
//! This crate turns statement tables and a company record into a scored
//! valuation:
//! - Fields: alias strategy table mapping logical line items to row labels
//! - Resolve: single-value resolution and trailing-twelve-month sums
//! - Derived: the seven valuation ratios and their validity
//! - Scoring: threshold bands per metric and the composite reduction
//!
//! Data flows one way, from tables to figures to ratios to scores.
//!
//! # Example
//!
//! ```ignore
//! use tasador_metrics::{Valuator, ValuationInputs};
//!
//! let valuator = Valuator::default();
//! let result = valuator.evaluate("aapl", &ValuationInputs {
//!     company: &info,
//!     quarterly_cash_flow: Some(&cash_flow),
//!     income_statement: Some(&income),
//!     revenue_estimates: None,
//! })?;
//! println!("{} {:.2}", result.overall_rating, result.final_score);
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod derived;
pub mod fields;
pub mod registry;
pub mod resolve;
pub mod scoring;
pub mod snapshot;
pub mod valuation;

// Re-export key types
pub use derived::{DerivedFigures, DerivedMetric, MetricCalculator, ValuationInputs};
pub use fields::{AliasTable, FieldAliases, LineItem};
pub use registry::{MetricBasis, MetricId, MetricInfo};
pub use resolve::{DEFAULT_TTM_PERIODS, resolve, sum_recent_periods};
pub use scoring::{Band, Composite, OverallRating, Rating, ScoredMetric, ScoringPolicy};
pub use snapshot::StockSnapshot;
pub use valuation::{ValuationResult, Valuator};
