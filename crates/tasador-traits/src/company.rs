//! Company-level scalar snapshot.

use serde::{Deserialize, Serialize};

/// Placeholder `quoteType` a provider returns for tickers it does not know.
pub const UNKNOWN_QUOTE_TYPE: &str = "NONE";

/// Company-level figures as reported by the market-data provider.
///
/// Every figure is optional: the provider is authoritative when it reports a
/// value and nothing here is ever filled in by guesswork. Field names follow the
/// provider's company-info record, so the JSON form deserializes directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyInfo {
    /// Ticker symbol.
    pub symbol: String,
    /// Company long name; absent for unknown tickers.
    pub long_name: Option<String>,
    /// Instrument type (`EQUITY`, `ETF`, ... or `NONE` for unknown tickers).
    pub quote_type: Option<String>,
    /// Market capitalization.
    pub market_cap: Option<f64>,
    /// Trailing twelve month revenue.
    pub total_revenue: Option<f64>,
    /// Total debt.
    pub total_debt: Option<f64>,
    /// Cash and equivalents.
    pub total_cash: Option<f64>,
    /// Shares outstanding.
    pub shares_outstanding: Option<f64>,
    /// Beta against the market.
    pub beta: Option<f64>,
    /// Trailing price to earnings.
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<f64>,
    /// Forward price to earnings.
    #[serde(rename = "forwardPE")]
    pub forward_pe: Option<f64>,
    /// Trailing twelve month price to sales.
    #[serde(rename = "priceToSalesTrailing12Months")]
    pub price_to_sales_trailing: Option<f64>,
    /// Earnings growth estimate as a fraction (0.12 = 12%).
    pub earnings_growth: Option<f64>,
    /// Last regular-session price.
    pub regular_market_price: Option<f64>,
    /// Current price, used when the regular-session price is missing.
    pub current_price: Option<f64>,
}

impl CompanyInfo {
    /// Whether the record identifies a real, listed instrument.
    ///
    /// A missing or blank long name, or a `quoteType` of `NONE`, is the
    /// provider's way of saying the ticker does not exist.
    #[must_use]
    pub fn confirms_listing(&self) -> bool {
        let named = self
            .long_name
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty());
        let placeholder = self
            .quote_type
            .as_deref()
            .is_some_and(|kind| kind.eq_ignore_ascii_case(UNKNOWN_QUOTE_TYPE));
        named && !placeholder
    }

    /// Share price: regular-session price, falling back to the current price.
    #[must_use]
    pub fn price(&self) -> Option<f64> {
        self.regular_market_price.or(self.current_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listed() -> CompanyInfo {
        CompanyInfo {
            symbol: "AAPL".into(),
            long_name: Some("Apple Inc.".into()),
            quote_type: Some("EQUITY".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_confirms_listing() {
        assert!(listed().confirms_listing());
    }

    #[test]
    fn test_placeholder_quote_type_is_not_listed() {
        let info = CompanyInfo {
            quote_type: Some("NONE".into()),
            ..listed()
        };
        assert!(!info.confirms_listing());
    }

    #[test]
    fn test_missing_or_blank_name_is_not_listed() {
        let info = CompanyInfo {
            long_name: None,
            ..listed()
        };
        assert!(!info.confirms_listing());

        let info = CompanyInfo {
            long_name: Some("  ".into()),
            ..listed()
        };
        assert!(!info.confirms_listing());
    }

    #[test]
    fn test_price_fallback() {
        let mut info = listed();
        assert!(info.price().is_none());
        info.current_price = Some(101.0);
        assert_eq!(info.price(), Some(101.0));
        info.regular_market_price = Some(100.0);
        assert_eq!(info.price(), Some(100.0));
    }

    #[test]
    fn test_deserialize_provider_record() {
        let json = r#"{
            "symbol": "MSFT",
            "longName": "Microsoft Corporation",
            "quoteType": "EQUITY",
            "marketCap": 3100000000000.0,
            "trailingPE": 35.2,
            "forwardPE": 30.1,
            "priceToSalesTrailing12Months": 12.4,
            "earningsGrowth": 0.1
        }"#;
        let info: CompanyInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.long_name.as_deref(), Some("Microsoft Corporation"));
        assert_eq!(info.trailing_pe, Some(35.2));
        assert_eq!(info.forward_pe, Some(30.1));
        assert_eq!(info.price_to_sales_trailing, Some(12.4));
        assert_eq!(info.earnings_growth, Some(0.1));
        assert!(info.beta.is_none());
    }
}
