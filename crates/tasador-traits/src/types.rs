//! Common types used throughout tasador.

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// A market symbol identifier.
///
/// Symbols are ticker strings like "AAPL". Anything that crosses a lookup
/// boundary (cache, provider) should first go through [`normalize_symbol`].
pub type Symbol = String;

/// Normalize a user-supplied ticker: surrounding whitespace removed, uppercased.
#[must_use]
pub fn normalize_symbol(raw: &str) -> Symbol {
    raw.trim().to_uppercase()
}
