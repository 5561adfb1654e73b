//! Group long-format records into per-cohort development series

use crate::dataset::{ClaimRecord, RecordType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single (development period, value) observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DevelopmentPoint {
    pub development_period: u32,
    pub value: f64,
}

/// Actual and Expected series of one cohort, each sorted by development period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CohortSeries {
    pub actual: Vec<DevelopmentPoint>,
    pub expected: Vec<DevelopmentPoint>,
}

impl CohortSeries {
    /// Latest observed point, the anchor for A-vs-E comparisons
    pub fn last_actual(&self) -> Option<DevelopmentPoint> {
        self.actual.last().copied()
    }

    /// Expected to ultimate set at origin (the earliest Expected point)
    pub fn origin_e2u(&self) -> Option<f64> {
        self.expected.first().map(|p| p.value)
    }

    /// Actual value at exactly the given development period
    pub fn actual_at(&self, development_period: u32) -> Option<f64> {
        self.actual
            .binary_search_by_key(&development_period, |p| p.development_period)
            .ok()
            .map(|i| self.actual[i].value)
    }
}

/// Cohort label -> series for one class
///
/// `BTreeMap` keeps cohorts in chronological order since `YYYYQn` labels sort
/// lexicographically in time order.
pub type GroupedSeries = BTreeMap<String, CohortSeries>;

/// Bucket a class's records by cohort then type, sorted by development period
///
/// Duplicate records for the same (cohort, type, period) keep the last one
/// in input order. Cohorts with only Expected records are kept with an empty
/// Actual series.
pub fn group_by_cohort(records: &[ClaimRecord], class: &str) -> GroupedSeries {
    let mut buckets: BTreeMap<&str, (BTreeMap<u32, f64>, BTreeMap<u32, f64>)> = BTreeMap::new();

    for record in records.iter().filter(|r| r.class == class) {
        let (actual, expected) = buckets.entry(record.cohort.as_str()).or_default();
        let bucket = match record.record_type {
            RecordType::Actual => actual,
            RecordType::Expected => expected,
        };
        bucket.insert(record.development_period, record.value);
    }

    buckets
        .into_iter()
        .map(|(cohort, (actual, expected))| {
            let series = CohortSeries {
                actual: to_points(actual),
                expected: to_points(expected),
            };
            (cohort.to_string(), series)
        })
        .collect()
}

fn to_points(bucket: BTreeMap<u32, f64>) -> Vec<DevelopmentPoint> {
    bucket
        .into_iter()
        .map(|(development_period, value)| DevelopmentPoint { development_period, value })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::motor_dataset;

    #[test]
    fn test_series_sorted_ascending() {
        let dataset = motor_dataset();
        let grouped = group_by_cohort(&dataset.records, "Motor");

        for series in grouped.values() {
            assert!(series
                .actual
                .windows(2)
                .all(|w| w[0].development_period < w[1].development_period));
            assert!(series
                .expected
                .windows(2)
                .all(|w| w[0].development_period < w[1].development_period));
        }
        let q1 = &grouped["2022Q1"];
        assert_eq!(q1.actual.len(), 8);
        assert_eq!(q1.last_actual().unwrap().value, 110.0);
        assert_eq!(q1.origin_e2u(), Some(150.0));
    }

    #[test]
    fn test_membership_is_exact() {
        let dataset = motor_dataset();
        let grouped = group_by_cohort(&dataset.records, "Motor");

        let motor_actual = dataset
            .records
            .iter()
            .filter(|r| r.class == "Motor" && r.record_type == RecordType::Actual)
            .count();
        let grouped_actual: usize = grouped.values().map(|s| s.actual.len()).sum();
        assert_eq!(motor_actual, grouped_actual);

        // No Property cohort leaks in
        let cohorts: Vec<&str> = grouped.keys().map(String::as_str).collect();
        assert_eq!(cohorts, vec!["2022Q1", "2022Q2", "2022Q3", "2022Q4", "2023Q1"]);
    }

    #[test]
    fn test_expected_only_cohort_has_no_anchor() {
        let dataset = motor_dataset();
        let grouped = group_by_cohort(&dataset.records, "Motor");
        let q = &grouped["2023Q1"];
        assert!(q.actual.is_empty());
        assert!(q.last_actual().is_none());
        assert_eq!(q.origin_e2u(), Some(160.0));
    }

    #[test]
    fn test_duplicate_period_last_wins() {
        let mut dataset = motor_dataset();
        let mut dup = dataset.records[0].clone();
        dup.value = 999.0;
        let dp = dup.development_period;
        let cohort = dup.cohort.clone();
        dataset.records.push(dup);

        let grouped = group_by_cohort(&dataset.records, "Motor");
        assert_eq!(grouped[&cohort].actual_at(dp), Some(999.0));
    }

    #[test]
    fn test_unknown_class_is_empty() {
        let dataset = motor_dataset();
        assert!(group_by_cohort(&dataset.records, "Marine").is_empty());
    }
}
