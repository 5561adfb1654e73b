//! Current and prior ultimate lookups per (class, cohort, method)
//!
//! `None` means "no estimate" and is kept distinct from a zero estimate so
//! ratio calculations downstream can skip rather than divide by zero.

use crate::dataset::{DatasetIndex, MethodType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

impl DatasetIndex {
    /// Current ultimate for a cohort under a method
    pub fn ultimate(&self, class: &str, cohort: &str, method: &str) -> Option<f64> {
        self.ultimate_row(class, cohort, method).map(|u| u.value)
    }

    /// Ultimate for the same key at the prior evaluation
    pub fn prior_ultimate(&self, class: &str, cohort: &str, method: &str) -> Option<f64> {
        self.prior_ultimate_row(class, cohort, method).map(|u| u.value)
    }

    /// Sum of a method's current ultimates across every cohort of a class
    pub fn total_ultimate(&self, class: &str, method: &str) -> f64 {
        self.ultimates_for_class(class)
            .filter(|u| u.method == method)
            .map(|u| u.value)
            .sum()
    }

    /// Sum of a method's prior ultimates across every cohort of a class
    pub fn prior_total_ultimate(&self, class: &str, method: &str) -> f64 {
        self.prior_ultimates_for_class(class)
            .filter(|u| u.method == method)
            .map(|u| u.value)
            .sum()
    }

    /// Methods with at least one current ultimate for a class
    pub fn methods_for_class(&self, class: &str) -> BTreeSet<String> {
        self.ultimates_for_class(class).map(|u| u.method.clone()).collect()
    }

    /// Family of a method, taken from any of its ultimate rows for the class
    pub fn method_type(&self, class: &str, method: &str) -> Option<MethodType> {
        self.ultimates_for_class(class)
            .chain(self.prior_ultimates_for_class(class))
            .find(|u| u.method == method)
            .map(|u| u.method_type)
    }

    /// Largest current ultimate among methods of one family for a cohort
    pub fn max_ultimate_of_type(&self, class: &str, cohort: &str, method_type: MethodType) -> Option<f64> {
        self.ultimates_for_class(class)
            .filter(|u| u.cohort == cohort && u.method_type == method_type)
            .map(|u| u.value)
            .reduce(f64::max)
    }
}

/// Percentage change of `current` over `prior`, `None` when either is missing or prior is zero
pub fn change_pct(current: Option<f64>, prior: Option<f64>) -> Option<f64> {
    match (current, prior) {
        (Some(current), Some(prior)) if prior != 0.0 => Some((current - prior) / prior * 100.0),
        _ => None,
    }
}

/// Current vs prior ultimate for one cohort under the selected method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UltimateMovement {
    pub cohort: String,
    pub current: Option<f64>,
    pub prior: Option<f64>,
    pub change: Option<f64>,
    pub change_pct: Option<f64>,
}

/// Ultimate movement table for every cohort with a current or prior estimate
pub fn ultimate_movements(index: &DatasetIndex, class: &str, method: &str) -> Vec<UltimateMovement> {
    let cohorts: BTreeSet<&str> = index
        .ultimates_for_class(class)
        .chain(index.prior_ultimates_for_class(class))
        .filter(|u| u.method == method)
        .map(|u| u.cohort.as_str())
        .collect();

    cohorts
        .into_iter()
        .map(|cohort| {
            let current = index.ultimate(class, cohort, method);
            let prior = index.prior_ultimate(class, cohort, method);
            UltimateMovement {
                cohort: cohort.to_string(),
                current,
                prior,
                change: current.zip(prior).map(|(c, p)| c - p),
                change_pct: change_pct(current, prior),
            }
        })
        .collect()
}
