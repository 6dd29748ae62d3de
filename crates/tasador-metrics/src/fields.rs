//! Alias strategy table for statement line items.
//!
//! Providers label the same quantity differently across sources and over
//! time. Each logical line item maps to an ordered list of acceptable labels;
//! the first label that resolves wins. New label variants are additive: append
//! them with [`AliasTable::with_alias`] or in the configuration file.

use serde::{Deserialize, Serialize};

/// A logical statement quantity the calculator needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItem {
    /// Total revenue (income statement).
    TotalRevenue,
    /// Cost of revenue (income statement).
    CostOfRevenue,
    /// Operating cash flow (cash-flow statement).
    OperatingCashFlow,
    /// Capital expenditure (cash-flow statement), conventionally non-positive.
    CapitalExpenditure,
}

/// Candidate labels for one line item, in preference order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldAliases {
    /// The logical quantity.
    pub field: LineItem,
    /// Row labels to try, first match wins.
    pub labels: Vec<String>,
}

/// Ordered `(line item, labels)` pairs consumed by the field resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasTable {
    entries: Vec<FieldAliases>,
}

impl AliasTable {
    /// Builds a table from explicit entries.
    #[must_use]
    pub const fn new(entries: Vec<FieldAliases>) -> Self {
        Self { entries }
    }

    /// Labels for a line item; empty when the table has no entry for it.
    #[must_use]
    pub fn aliases(&self, field: LineItem) -> &[String] {
        self.entries
            .iter()
            .find(|entry| entry.field == field)
            .map(|entry| entry.labels.as_slice())
            .unwrap_or_default()
    }

    /// Appends a label variant at the lowest preference.
    #[must_use]
    pub fn with_alias(mut self, field: LineItem, label: impl Into<String>) -> Self {
        let label = label.into();
        match self.entries.iter_mut().find(|entry| entry.field == field) {
            Some(entry) => {
                if !entry.labels.contains(&label) {
                    entry.labels.push(label);
                }
            }
            None => self.entries.push(FieldAliases {
                field,
                labels: vec![label],
            }),
        }
        self
    }

    /// All entries in declaration order.
    #[must_use]
    pub fn entries(&self) -> &[FieldAliases] {
        &self.entries
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        let entry = |field, labels: &[&str]| FieldAliases {
            field,
            labels: labels.iter().map(|label| (*label).to_string()).collect(),
        };
        Self::new(vec![
            entry(LineItem::TotalRevenue, &["Total Revenue", "Revenue"]),
            entry(LineItem::CostOfRevenue, &["Cost Of Revenue"]),
            entry(
                LineItem::OperatingCashFlow,
                &[
                    "Total Cash From Operating Activities",
                    "Operating Cash Flow",
                    "Cash Flow From Continuing Operating Activities",
                ],
            ),
            entry(
                LineItem::CapitalExpenditure,
                &[
                    "Capital Expenditure",
                    "Change In Fixed Assets & Intangibles",
                ],
            ),
        ])
    }
}
