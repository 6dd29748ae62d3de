//! Service configuration.
//!
//! Settings come from an optional JSON file, then environment variables
//! (after loading `.env`), then built-in defaults for anything left unset.

use crate::cache::DEFAULT_TTL_SECS;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};
use tasador_metrics::{AliasTable, DEFAULT_TTM_PERIODS, ScoringPolicy};
use tasador_traits::{Result, TasadorError};
use tracing::debug;

/// Environment variable overriding the cache TTL.
pub const CACHE_TTL_ENV: &str = "TASADOR_CACHE_TTL_SECS";
/// Environment variable overriding the TTM window.
pub const TTM_PERIODS_ENV: &str = "TASADOR_TTM_PERIODS";

/// Tunable settings of the valuation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Seconds a cached result stays fresh.
    pub cache_ttl_secs: u64,
    /// Quarters summed into trailing figures.
    pub ttm_periods: usize,
    /// Threshold bands and composite cut-offs.
    pub policy: ScoringPolicy,
    /// Row labels tried for each line item.
    pub aliases: AliasTable,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: DEFAULT_TTL_SECS,
            ttm_periods: DEFAULT_TTM_PERIODS,
            policy: ScoringPolicy::default(),
            aliases: AliasTable::default(),
        }
    }
}

impl ServiceConfig {
    /// Read a JSON configuration file. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`TasadorError::Config`] if the file cannot be read or parsed,
    /// or if the scoring policy is invalid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| TasadorError::Config(format!("{}: {e}", path.display())))?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| TasadorError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an optional file and the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`TasadorError::Config`] on an unreadable file or a malformed
    /// override.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        // a missing .env is fine
        let _ = dotenvy::dotenv();

        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.with_overrides(|key| env::var(key).ok())?;
        debug!(
            cache_ttl_secs = config.cache_ttl_secs,
            ttm_periods = config.ttm_periods,
            "service configuration loaded"
        );
        Ok(config)
    }

    /// Apply `TASADOR_*` overrides from a variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`TasadorError::Config`] when an override is not a
    /// non-negative integer or leaves the configuration invalid.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(raw) = lookup(CACHE_TTL_ENV) {
            self.cache_ttl_secs = parse_override(CACHE_TTL_ENV, &raw)?;
        }
        if let Some(raw) = lookup(TTM_PERIODS_ENV) {
            self.ttm_periods = parse_override(TTM_PERIODS_ENV, &raw)?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check cross-field invariants.
    ///
    /// # Errors
    ///
    /// Returns [`TasadorError::Config`] for a zero TTM window or an invalid
    /// scoring policy.
    pub fn validate(&self) -> Result<()> {
        if self.ttm_periods == 0 {
            return Err(TasadorError::Config("ttm_periods must be at least 1".into()));
        }
        self.policy.validate()
    }
}

fn parse_override<N: std::str::FromStr>(key: &str, raw: &str) -> Result<N>
where
    N::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| TasadorError::Config(format!("{key}={raw:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tasador_metrics::{LineItem, MetricId, Rating};

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.cache_ttl_secs, 3600);
        assert_eq!(config.ttm_periods, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let config = ServiceConfig::default()
            .with_overrides(vars(&[(CACHE_TTL_ENV, "60"), (TTM_PERIODS_ENV, " 8 ")]))
            .unwrap();
        assert_eq!(config.cache_ttl_secs, 60);
        assert_eq!(config.ttm_periods, 8);

        let err = ServiceConfig::default()
            .with_overrides(vars(&[(CACHE_TTL_ENV, "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains(CACHE_TTL_ENV));

        assert!(
            ServiceConfig::default()
                .with_overrides(vars(&[(TTM_PERIODS_ENV, "0")]))
                .is_err()
        );
    }

    #[test]
    fn test_partial_json() {
        let json = r#"{
            "cache_ttl_secs": 120,
            "aliases": [{"field": "total_revenue", "labels": ["Net Sales"]}],
            "policy": {"thresholds": {"price_to_earnings": [{"upper_bound": 10.0, "score": 5}]}}
        }"#;
        let config: ServiceConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.cache_ttl_secs, 120);
        assert_eq!(config.ttm_periods, 4);
        assert_eq!(config.aliases.aliases(LineItem::TotalRevenue), ["Net Sales"]);
        assert_eq!(
            config.policy.score(MetricId::PriceToEarnings, Some(12.0)),
            (0, Rating::VeryExpensive)
        );
    }

    #[test]
    fn test_from_file() {
        let path = env::temp_dir().join(format!("tasador-config-{}.json", std::process::id()));
        fs::write(&path, r#"{"ttm_periods": 2}"#).unwrap();
        let config = ServiceConfig::from_file(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(config.ttm_periods, 2);

        let err = ServiceConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, TasadorError::Config(_)));
    }
}
