//! Fanning detection across chronologically ordered cohorts
//!
//! A cohort "fans" when its latest normalized value sits more than the
//! configured deviation above the mean of strictly older cohorts at the same
//! development period. This is a heuristic early-warning signal for
//! accelerating development. It is not a statistical test and carries no
//! false-positive-rate guarantee.

use super::development::DevelopmentSeries;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Minimum points a cohort needs before it is assessed
const MIN_POINTS: usize = 2;

/// Number of older cohorts required before the first assessment
const MIN_OLDER_COHORTS: usize = 2;

/// Comparison of one cohort against its elders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FanningSignal {
    pub cohort: String,
    pub development_period: u32,
    pub value: f64,
    /// Mean of older cohorts at the same development period
    pub older_mean: f64,
    /// Number of older cohorts contributing to the mean
    pub older_count: usize,
    pub is_fanning: bool,
}

impl FanningSignal {
    pub fn excess(&self) -> f64 {
        self.value - self.older_mean
    }
}

/// Evaluate every assessable cohort, flagged or not
///
/// `series` must be in chronological order (oldest first).
pub fn fanning_signals(series: &[DevelopmentSeries], deviation: f64) -> Vec<FanningSignal> {
    let mut signals = Vec::new();

    for (i, current) in series.iter().enumerate().skip(MIN_OLDER_COHORTS) {
        if current.points.len() < MIN_POINTS {
            continue;
        }
        let Some(latest) = current.latest() else {
            continue;
        };

        let older: Vec<f64> = series[..i]
            .iter()
            .filter_map(|s| s.value_at(latest.development_period))
            .collect();
        if older.is_empty() {
            continue;
        }
        let older_mean = older.iter().sum::<f64>() / older.len() as f64;

        signals.push(FanningSignal {
            cohort: current.cohort.clone(),
            development_period: latest.development_period,
            value: latest.value,
            older_mean,
            older_count: older.len(),
            is_fanning: latest.value - older_mean > deviation,
        });
    }

    signals
}

/// Cohorts whose latest value exceeds the older-cohort mean by more than `deviation`
pub fn detect_fanning(series: &[DevelopmentSeries], deviation: f64) -> BTreeSet<String> {
    fanning_signals(series, deviation)
        .into_iter()
        .filter(|s| s.is_fanning)
        .map(|s| s.cohort)
        .collect()
}
