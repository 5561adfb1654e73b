//! Analysis configuration and view selection state
//!
//! Every heuristic constant used by the normalizer, fanning detector and
//! decision engine lives here with its reference default. Overrides can be
//! loaded from a JSON file; omitted fields keep their defaults.

use crate::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// One year of quarterly development
pub const DEFAULT_BASE_DEVELOPMENT_PERIOD: u32 = 4;

/// Development horizon (quarters) of the expected-at-period curve
pub const DEFAULT_MAX_DEVELOPMENT_PERIOD: u32 = 12;

/// Percentage points above the older-cohort mean that count as fanning
pub const DEFAULT_FANNING_DEVIATION_PCT: f64 = 10.0;

/// Default projection quality threshold for the method filter
pub const DEFAULT_QUALITY_THRESHOLD: f64 = 0.5;

/// Thresholds used by the reserving decision rules
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionThresholds {
    /// A-vs-E ratios within +/- this fraction are not actionable
    pub ae_tolerance: f64,
    /// Claim count growth (fraction) that points to frequency
    pub claim_count_growth: f64,
    /// Large-loss share of movement (percent) that points to large losses
    pub large_loss_share_pct: f64,
    /// Earned premium growth (fraction) that points to exposure growth
    pub premium_growth: f64,
}

impl Default for DecisionThresholds {
    fn default() -> Self {
        Self {
            ae_tolerance: 0.05,
            claim_count_growth: 0.15,
            large_loss_share_pct: 50.0,
            premium_growth: 0.10,
        }
    }
}

/// Cut-offs for the High / Medium / Low score buckets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketThresholds {
    pub high: f64,
    pub medium: f64,
}

impl Default for BucketThresholds {
    fn default() -> Self {
        Self { high: 0.7, medium: 0.4 }
    }
}

/// Configuration injected into every derivation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Development period treated as "year 1" for the percent-of-year-1 view
    pub base_development_period: u32,

    /// Horizon MAX of the expected curve `1 - (1 - dp/MAX)^2`
    pub max_development_period: u32,

    /// Fanning deviation in percentage points
    pub fanning_deviation_pct: f64,

    /// Decision rule thresholds
    pub decision: DecisionThresholds,

    /// Score bucket cut-offs
    pub buckets: BucketThresholds,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            base_development_period: DEFAULT_BASE_DEVELOPMENT_PERIOD,
            max_development_period: DEFAULT_MAX_DEVELOPMENT_PERIOD,
            fanning_deviation_pct: DEFAULT_FANNING_DEVIATION_PCT,
            decision: DecisionThresholds::default(),
            buckets: BucketThresholds::default(),
        }
    }
}

impl AnalysisConfig {
    /// Load a configuration from a JSON file, filling gaps with defaults
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validated()
    }

    /// Reject configurations the derivations cannot use
    pub fn validated(self) -> Result<Self> {
        if self.max_development_period == 0 {
            return Err(DashboardError::InvalidConfig(
                "max_development_period must be positive".to_string(),
            ));
        }
        Ok(self)
    }
}

/// Immutable selection state for one rendered view
///
/// Replaces ambient "current class / method / threshold" globals: each
/// derivation receives the selection explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub class: String,
    pub method: String,
    pub quality_threshold: f64,
    pub selected_cohort: Option<String>,
}

impl ViewState {
    pub fn new(class: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            method: method.into(),
            quality_threshold: DEFAULT_QUALITY_THRESHOLD,
            selected_cohort: None,
        }
    }

    /// Set the quality threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.quality_threshold = threshold;
        self
    }

    /// Select a cohort for drill-down
    pub fn with_cohort(mut self, cohort: impl Into<String>) -> Self {
        self.selected_cohort = Some(cohort.into());
        self
    }
}
