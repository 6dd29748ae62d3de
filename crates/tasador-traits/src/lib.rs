#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tasador/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types and the provider contract for the tasador valuation engine.
//!
//! This crate provides the data structures every other tasador crate speaks:
//! the tabular financial statement container, the company snapshot record, the
//! error type, and the trait a market-data provider implements.

/// The version of the tasador-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Module declarations
pub mod company;
pub mod error;
pub mod provider;
pub mod table;
pub mod types;

// Re-exports
pub use company::CompanyInfo;
pub use error::{Result, TasadorError};
pub use provider::MarketDataProvider;
pub use table::{FinancialTable, LINE_ITEM_COLUMN};
pub use types::{Date, Symbol, normalize_symbol};
