//! Method comparison table for a class

use super::ultimates::change_pct;
use crate::dataset::{DatasetIndex, MethodType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One method's scores and class-level ultimate totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodSummary {
    pub method: String,
    pub method_type: Option<MethodType>,
    pub projection_quality: f64,
    pub reserve_determinism: f64,
    pub prior_reserve_determinism: f64,
    /// Whether the method passes the active quality threshold (dimmed otherwise)
    pub passes: bool,
    pub total_ultimate: f64,
    pub prior_total_ultimate: f64,
    pub total_change_pct: Option<f64>,
    pub pattern: String,
    pub incurred_vs_expected: String,
    pub approach: String,
    pub shap_contributions: BTreeMap<String, f64>,
}

impl MethodSummary {
    pub fn determinism_change(&self) -> f64 {
        self.reserve_determinism - self.prior_reserve_determinism
    }

    /// Feature with the largest absolute contribution
    pub fn dominant_feature(&self) -> Option<(&str, f64)> {
        self.shap_contributions
            .iter()
            .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
            .map(|(k, v)| (k.as_str(), *v))
    }
}

/// Scored methods of a class, best projection quality first
pub fn method_summaries(index: &DatasetIndex, class: &str, threshold: f64) -> Vec<MethodSummary> {
    let mut rows: Vec<MethodSummary> = index
        .scores_for_class(class)
        .map(|score| {
            let total = index.total_ultimate(class, &score.method);
            let prior_total = index.prior_total_ultimate(class, &score.method);
            MethodSummary {
                method: score.method.clone(),
                method_type: index.method_type(class, &score.method),
                projection_quality: score.projection_quality,
                reserve_determinism: score.reserve_determinism,
                prior_reserve_determinism: score.prior_reserve_determinism,
                passes: score.projection_quality >= threshold,
                total_ultimate: total,
                prior_total_ultimate: prior_total,
                total_change_pct: change_pct(Some(total), Some(prior_total)),
                pattern: score.pattern.clone(),
                incurred_vs_expected: score.incurred_vs_expected.clone(),
                approach: score.approach.clone(),
                shap_contributions: score.shap_contributions.clone(),
            }
        })
        .collect();

    rows.sort_by(|a, b| b.projection_quality.total_cmp(&a.projection_quality));
    rows
}
