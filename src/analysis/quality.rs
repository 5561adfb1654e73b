//! Method quality filter and the resulting ultimate band per cohort

use crate::config::BucketThresholds;
use crate::dataset::DatasetIndex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Spread of passing methods' ultimates for one cohort
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UltimateBand {
    pub min: f64,
    pub max: f64,
    /// Number of passing methods with an ultimate for the cohort
    pub count: usize,
}

impl UltimateBand {
    pub fn width(&self) -> f64 {
        self.max - self.min
    }
}

/// Methods of a class whose projection quality is at or above `threshold`
pub fn passing_methods(index: &DatasetIndex, class: &str, threshold: f64) -> BTreeSet<String> {
    index
        .scores_for_class(class)
        .filter(|s| s.projection_quality >= threshold)
        .map(|s| s.method.clone())
        .collect()
}

/// Min/max ultimate over passing methods, `None` when none has an estimate
pub fn ultimate_band(
    index: &DatasetIndex,
    class: &str,
    cohort: &str,
    passing: &BTreeSet<String>,
) -> Option<UltimateBand> {
    passing
        .iter()
        .filter_map(|method| index.ultimate(class, cohort, method))
        .fold(None, |band, value| {
            Some(match band {
                None => UltimateBand { min: value, max: value, count: 1 },
                Some(b) => UltimateBand {
                    min: b.min.min(value),
                    max: b.max.max(value),
                    count: b.count + 1,
                },
            })
        })
}

/// Bands for every given cohort that has at least one passing estimate
pub fn ultimate_bands<'a, I>(
    index: &DatasetIndex,
    class: &str,
    cohorts: I,
    passing: &BTreeSet<String>,
) -> BTreeMap<String, UltimateBand>
where
    I: IntoIterator<Item = &'a String>,
{
    cohorts
        .into_iter()
        .filter_map(|cohort| {
            ultimate_band(index, class, cohort, passing).map(|band| (cohort.clone(), band))
        })
        .collect()
}

/// Coarse credibility bucket for a [0, 1] score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreBucket {
    High,
    Medium,
    Low,
}

impl ScoreBucket {
    pub fn from_score(score: f64, thresholds: &BucketThresholds) -> Self {
        if score >= thresholds.high {
            ScoreBucket::High
        } else if score >= thresholds.medium {
            ScoreBucket::Medium
        } else {
            ScoreBucket::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBucket::High => "High",
            ScoreBucket::Medium => "Medium",
            ScoreBucket::Low => "Low",
        }
    }
}
