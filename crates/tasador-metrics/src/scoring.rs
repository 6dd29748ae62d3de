//! Threshold scoring and composite reduction.
//!
//! Thresholds and cut-offs live in a [`ScoringPolicy`].
//! [`ScoringPolicy::default`] holds the stock bands; a JSON policy can replace
//! them and is validated on load.

use crate::{derived::DerivedMetric, registry::MetricId};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tasador_traits::TasadorError;

/// Scores a band may award, cheapest first.
pub const BAND_SCORES: [u8; 3] = [5, 3, 1];

/// Highest attainable score.
pub const MAX_SCORE: u8 = 5;

/// Per-metric rating label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum Rating {
    /// Score 5.
    #[display("Very Cheap")]
    #[serde(rename = "Very Cheap")]
    VeryCheap,
    /// Score 3.
    #[display("Fair Price")]
    #[serde(rename = "Fair Price")]
    FairPrice,
    /// Score 1.
    #[display("Expensive")]
    Expensive,
    /// Score 0: at or above every configured bound.
    #[display("Very Expensive")]
    #[serde(rename = "Very Expensive")]
    VeryExpensive,
    /// Value absent, not a number, or not scorable.
    #[display("N/A")]
    #[serde(rename = "N/A")]
    NotAvailable,
}

impl Rating {
    /// Label for a band score; `None` for scores no band can award.
    #[must_use]
    pub const fn from_score(score: u8) -> Option<Self> {
        match score {
            5 => Some(Self::VeryCheap),
            3 => Some(Self::FairPrice),
            1 => Some(Self::Expensive),
            0 => Some(Self::VeryExpensive),
            _ => None,
        }
    }
}

/// Rating of the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum OverallRating {
    /// Composite at or above the cheap cut-off.
    #[display("Cheap")]
    Cheap,
    /// Composite at or above the fair cut-off.
    #[display("Fair Price")]
    #[serde(rename = "Fair Price")]
    FairPrice,
    /// Any positive composite below the fair cut-off.
    #[display("Expensive")]
    Expensive,
    /// No valid metric contributed.
    #[display("Unknown")]
    Unknown,
}

/// One threshold: values strictly below `upper_bound` earn `score`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    /// Exclusive upper bound.
    pub upper_bound: f64,
    /// Score awarded inside the band.
    pub score: u8,
}

impl Band {
    const fn new(upper_bound: f64, score: u8) -> Self {
        Self { upper_bound, score }
    }
}

/// A derived metric with its score and rating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredMetric {
    /// Which ratio.
    pub metric: MetricId,
    /// The ratio, `None` when it could not be computed.
    pub value: Option<f64>,
    /// Whether the value counts towards the composite.
    pub valid: bool,
    /// Band score in {0, 1, 3, 5}.
    pub score: u8,
    /// Label for the score.
    pub rating: Rating,
}

/// Composite score and its rating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Composite {
    /// Mean score of valid metrics, in `[0, 5]`.
    pub final_score: f64,
    /// Rating band of the final score.
    pub overall_rating: OverallRating,
    /// Number of metrics that contributed.
    pub valid_metrics: usize,
}

/// Threshold bands per metric and composite cut-offs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PolicyConfig")]
pub struct ScoringPolicy {
    thresholds: BTreeMap<MetricId, Vec<Band>>,
    cheap_cutoff: f64,
    fair_cutoff: f64,
}

#[derive(Deserialize)]
#[serde(default)]
struct PolicyConfig {
    thresholds: BTreeMap<MetricId, Vec<Band>>,
    cheap_cutoff: f64,
    fair_cutoff: f64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        let ScoringPolicy {
            thresholds,
            cheap_cutoff,
            fair_cutoff,
        } = ScoringPolicy::default();
        Self {
            thresholds,
            cheap_cutoff,
            fair_cutoff,
        }
    }
}

impl TryFrom<PolicyConfig> for ScoringPolicy {
    type Error = TasadorError;

    fn try_from(config: PolicyConfig) -> Result<Self, Self::Error> {
        Self::new(config.thresholds, config.cheap_cutoff, config.fair_cutoff)
    }
}

impl ScoringPolicy {
    /// Build and validate a policy.
    ///
    /// # Errors
    ///
    /// Returns [`TasadorError::Config`] when a band awards a score outside
    /// {1, 3, 5}, bounds are not finite and strictly increasing, scores rise
    /// with the bound, or the cut-offs are not `cheap >= fair > 0`.
    pub fn new(
        thresholds: BTreeMap<MetricId, Vec<Band>>,
        cheap_cutoff: f64,
        fair_cutoff: f64,
    ) -> Result<Self, TasadorError> {
        let policy = Self {
            thresholds,
            cheap_cutoff,
            fair_cutoff,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Check the invariants listed on [`ScoringPolicy::new`].
    ///
    /// # Errors
    ///
    /// Returns [`TasadorError::Config`] describing the first violation.
    pub fn validate(&self) -> Result<(), TasadorError> {
        for (metric, bands) in &self.thresholds {
            for band in bands {
                if !BAND_SCORES.contains(&band.score) {
                    return Err(TasadorError::Config(format!(
                        "{metric}: score {} is not one of {BAND_SCORES:?}",
                        band.score
                    )));
                }
                if !band.upper_bound.is_finite() {
                    return Err(TasadorError::Config(format!(
                        "{metric}: bound {} is not finite",
                        band.upper_bound
                    )));
                }
            }
            for pair in bands.windows(2) {
                if pair[1].upper_bound <= pair[0].upper_bound {
                    return Err(TasadorError::Config(format!(
                        "{metric}: bounds must be strictly increasing"
                    )));
                }
                if pair[1].score > pair[0].score {
                    return Err(TasadorError::Config(format!(
                        "{metric}: scores must not increase with the bound"
                    )));
                }
            }
        }

        if !(self.fair_cutoff > 0.0 && self.cheap_cutoff >= self.fair_cutoff) {
            return Err(TasadorError::Config(format!(
                "cut-offs must satisfy cheap >= fair > 0, got cheap={} fair={}",
                self.cheap_cutoff, self.fair_cutoff
            )));
        }
        Ok(())
    }

    /// Bands configured for a metric, cheapest first.
    #[must_use]
    pub fn bands(&self, metric: MetricId) -> &[Band] {
        self.thresholds
            .get(&metric)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Composite cut-off for "Cheap".
    #[must_use]
    pub const fn cheap_cutoff(&self) -> f64 {
        self.cheap_cutoff
    }

    /// Composite cut-off for "Fair Price".
    #[must_use]
    pub const fn fair_cutoff(&self) -> f64 {
        self.fair_cutoff
    }

    /// Score a raw value against a metric's bands.
    ///
    /// Absent, NaN, and negative values are `(0, N/A)`. Otherwise the first
    /// band whose bound exceeds the value decides; a value at or above every
    /// bound is `(0, Very Expensive)`.
    #[must_use]
    pub fn score(&self, metric: MetricId, value: Option<f64>) -> (u8, Rating) {
        let Some(value) = value.filter(|v| !v.is_nan() && *v >= 0.0) else {
            return (0, Rating::NotAvailable);
        };
        self.bands(metric)
            .iter()
            .find(|band| value < band.upper_bound)
            .and_then(|band| Rating::from_score(band.score).map(|rating| (band.score, rating)))
            .unwrap_or((0, Rating::VeryExpensive))
    }

    /// Score a derived metric.
    ///
    /// Invalid metrics (absent, zero, negative, non-finite) are reported as
    /// `(0, N/A)` and later excluded from the composite.
    #[must_use]
    pub fn score_metric(&self, metric: &DerivedMetric) -> ScoredMetric {
        let (score, rating) = if metric.valid {
            self.score(metric.metric, metric.value)
        } else {
            (0, Rating::NotAvailable)
        };
        ScoredMetric {
            metric: metric.metric,
            value: metric.value,
            valid: metric.valid,
            score,
            rating,
        }
    }

    /// Score every metric, preserving order.
    #[must_use]
    pub fn score_all(&self, metrics: &[DerivedMetric]) -> Vec<ScoredMetric> {
        metrics.iter().map(|metric| self.score_metric(metric)).collect()
    }

    /// Rating band of a composite score.
    #[must_use]
    pub fn overall_rating(&self, final_score: f64) -> OverallRating {
        if final_score >= self.cheap_cutoff {
            OverallRating::Cheap
        } else if final_score >= self.fair_cutoff {
            OverallRating::FairPrice
        } else if final_score > 0.0 {
            OverallRating::Expensive
        } else {
            OverallRating::Unknown
        }
    }

    /// Average the scores of valid metrics and rate the result.
    #[must_use]
    pub fn composite(&self, scored: &[ScoredMetric]) -> Composite {
        let valid: Vec<u8> = scored
            .iter()
            .filter(|metric| metric.valid)
            .map(|metric| metric.score)
            .collect();
        let final_score = if valid.is_empty() {
            0.0
        } else {
            valid.iter().map(|&score| f64::from(score)).sum::<f64>() / valid.len() as f64
        };
        Composite {
            final_score,
            overall_rating: self.overall_rating(final_score),
            valid_metrics: valid.len(),
        }
    }
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        let bands = |b: [(f64, u8); 3]| b.map(|(bound, score)| Band::new(bound, score)).to_vec();
        let thresholds = BTreeMap::from([
            (MetricId::PriceToSales, bands([(4.0, 5), (8.0, 3), (12.0, 1)])),
            (MetricId::ForwardPriceToSales, bands([(5.0, 5), (10.0, 3), (15.0, 1)])),
            (MetricId::PriceToGrossProfit, bands([(8.0, 5), (12.0, 3), (18.0, 1)])),
            (MetricId::PriceToEarnings, bands([(16.0, 5), (25.0, 3), (35.0, 1)])),
            (MetricId::ForwardPriceToEarnings, bands([(15.0, 5), (25.0, 3), (35.0, 1)])),
            (MetricId::PriceToFreeCashFlow, bands([(12.0, 5), (18.0, 3), (30.0, 1)])),
            (MetricId::ForwardPriceToFreeCashFlow, bands([(15.0, 5), (25.0, 3), (40.0, 1)])),
        ]);
        Self {
            thresholds,
            cheap_cutoff: 4.0,
            fair_cutoff: 2.5,
        }
    }
}
