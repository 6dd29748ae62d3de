//! CLI subcommand modules.
//!
//! This module contains the implementations for all tasador CLI subcommands.

pub(crate) mod metrics;
pub(crate) mod snapshot;
pub(crate) mod treasury;
pub(crate) mod valuation;
