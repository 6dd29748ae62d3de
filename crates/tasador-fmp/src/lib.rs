//! Financial Modeling Prep (FMP) market-data provider for tasador.
//!
//! This crate provides a client for fetching company profiles, statements,
//! analyst estimates and treasury rates from the
//! [Financial Modeling Prep](https://financialmodelingprep.com/) API, and
//! implements [`tasador_traits::MarketDataProvider`] on top of it.
//!
//! # Usage
//!
//! ```rust,ignore
//! use tasador_fmp::FmpClient;
//! use tasador_traits::MarketDataProvider;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FmpClient::from_env()?;
//!
//!     let info = client.company_info("AAPL").await?;
//!     let cash_flow = client.quarterly_cash_flow("AAPL").await?;
//!     let estimates = client.revenue_estimates("AAPL").await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Environment Variables
//!
//! Set `FMP_API_KEY` in your environment or `.env` file:
//!
//! ```bash
//! FMP_API_KEY=your_api_key_here
//! ```

mod client;
pub mod convert;
mod error;
mod provider;
mod types;

pub use client::FmpClient;
pub use error::FmpError;
pub use types::*;

/// Result type for FMP operations.
pub type Result<T> = std::result::Result<T, FmpError>;
