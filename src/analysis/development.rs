//! Development normalizations and the expected-at-period curve
//!
//! The expected curve `f(dp) = 1 - (1 - dp/MAX)^2` is a fixed policy shape
//! approximating front-loaded development. It is not fit from data.

use super::grouping::{CohortSeries, DevelopmentPoint, GroupedSeries};
use crate::dataset::DatasetIndex;
use log::debug;
use serde::{Deserialize, Serialize};

/// A normalized development series for one cohort
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevelopmentSeries {
    pub cohort: String,
    pub points: Vec<DevelopmentPoint>,
}

impl DevelopmentSeries {
    pub fn latest(&self) -> Option<DevelopmentPoint> {
        self.points.last().copied()
    }

    pub fn value_at(&self, development_period: u32) -> Option<f64> {
        self.points
            .iter()
            .find(|p| p.development_period == development_period)
            .map(|p| p.value)
    }
}

/// Share of ultimate expected to have emerged by `dp`, clamped to [0, 1]
pub fn expected_development_fraction(dp: u32, max_development_period: u32) -> f64 {
    if max_development_period == 0 || dp >= max_development_period {
        return 1.0;
    }
    let remaining = 1.0 - dp as f64 / max_development_period as f64;
    (1.0 - remaining * remaining).clamp(0.0, 1.0)
}

/// Expected cumulative claims as of `dp` given the origin E2U
pub fn expected_at_period(e2u: f64, dp: u32, max_development_period: u32) -> f64 {
    e2u * expected_development_fraction(dp, max_development_period)
}

/// Latest actual compared with expected at the same development period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AeComparison {
    pub development_period: u32,
    pub actual: f64,
    pub expected: f64,
    /// `(actual - expected) / expected` as a fraction
    pub ratio: f64,
}

/// A-vs-E at the latest actual point, `None` without an anchor, an E2U, or a
/// non-zero expected value
pub fn ae_comparison(series: &CohortSeries, max_development_period: u32) -> Option<AeComparison> {
    let last = series.last_actual()?;
    let e2u = series.origin_e2u()?;
    let expected = expected_at_period(e2u, last.development_period, max_development_period);
    if expected == 0.0 {
        return None;
    }
    Some(AeComparison {
        development_period: last.development_period,
        actual: last.value,
        expected,
        ratio: (last.value - expected) / expected,
    })
}

fn scaled(points: &[DevelopmentPoint], denominator: f64) -> Vec<DevelopmentPoint> {
    points
        .iter()
        .map(|p| DevelopmentPoint {
            development_period: p.development_period,
            value: p.value / denominator * 100.0,
        })
        .collect()
}

/// Actual development as a percentage of the method's current ultimate
///
/// Cohorts without actuals or with a missing or zero ultimate are excluded.
pub fn percent_of_ultimate(
    index: &DatasetIndex,
    grouped: &GroupedSeries,
    class: &str,
    method: &str,
) -> Vec<DevelopmentSeries> {
    grouped
        .iter()
        .filter(|(_, series)| !series.actual.is_empty())
        .filter_map(|(cohort, series)| match index.ultimate(class, cohort, method) {
            Some(ultimate) if ultimate != 0.0 => Some(DevelopmentSeries {
                cohort: cohort.clone(),
                points: scaled(&series.actual, ultimate),
            }),
            _ => {
                debug!("{} {}: no usable {} ultimate, excluded from % of ultimate", class, cohort, method);
                None
            }
        })
        .collect()
}

/// Actual development as a percentage of the value at `base_development_period`
///
/// Cohorts without a non-zero actual at exactly the base period are excluded.
pub fn percent_of_year_one(grouped: &GroupedSeries, base_development_period: u32) -> Vec<DevelopmentSeries> {
    grouped
        .iter()
        .filter_map(|(cohort, series)| match series.actual_at(base_development_period) {
            Some(base) if base != 0.0 => Some(DevelopmentSeries {
                cohort: cohort.clone(),
                points: scaled(&series.actual, base),
            }),
            _ => {
                debug!("{}: no actual at period {}, excluded from % of year 1", cohort, base_development_period);
                None
            }
        })
        .collect()
}
