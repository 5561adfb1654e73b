//! Dataset structures matching the dashboard JSON payload

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Whether a record is an observed or an expected value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RecordType {
    /// Observed cumulative incurred claims
    Actual,
    /// Expected to ultimate set at the cohort's origin
    Expected,
}

impl RecordType {
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "Actual" => Some(RecordType::Actual),
            "Expected" => Some(RecordType::Expected),
            _ => None,
        }
    }
}

/// One long-format observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRecord {
    #[serde(rename = "Class", alias = "class")]
    pub class: String,
    #[serde(rename = "Cohort", alias = "cohort")]
    pub cohort: String,
    #[serde(rename = "Development_Period", alias = "developmentPeriod")]
    pub development_period: u32,
    #[serde(rename = "Type", alias = "type")]
    pub record_type: RecordType,
    #[serde(rename = "Value", alias = "value")]
    pub value: f64,
}

/// Family a reserving method belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MethodType {
    /// Projects from observed claims (chain ladder and friends)
    #[serde(alias = "Claims-based", alias = "Claims Based")]
    ClaimsBased,
    /// Projects from exposure (expected loss ratio and friends)
    #[serde(alias = "Premium-based", alias = "Premium Based")]
    PremiumBased,
}

impl MethodType {
    pub fn label(&self) -> &'static str {
        match self {
            MethodType::ClaimsBased => "Claims-based",
            MethodType::PremiumBased => "Premium-based",
        }
    }
}

/// A method's ultimate estimate for one cohort
///
/// The same shape is used for prior-evaluation ultimates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UltimateEstimate {
    pub class: String,
    pub cohort: String,
    pub method: String,
    pub value: f64,
    pub method_type: MethodType,
}

/// Per-method quality scores for a class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodScore {
    pub class: String,
    pub method: String,
    /// Share of the reserve explained by deterministic structure, in [0, 1]
    pub reserve_determinism: f64,
    /// Reserve determinism at the prior evaluation, in [0, 1]
    pub prior_reserve_determinism: f64,
    /// Back-tested projection quality, in [0, 1]
    pub projection_quality: f64,
    #[serde(default)]
    pub pattern: String,
    #[serde(default)]
    pub incurred_vs_expected: String,
    #[serde(default)]
    pub approach: String,
    /// Signed feature contributions to the quality score
    #[serde(default)]
    pub shap_contributions: BTreeMap<String, f64>,
}

/// Current and prior incurred for one claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimMovement {
    pub class: String,
    pub cohort: String,
    pub claim_id: String,
    #[serde(default)]
    pub status: String,
    pub incurred_current: f64,
    pub incurred_prior: f64,
}

impl ClaimMovement {
    /// Change in incurred since the prior evaluation
    pub fn movement(&self) -> f64 {
        self.incurred_current - self.incurred_prior
    }

    /// Whether the claim is at or above the large-loss threshold
    pub fn is_large(&self, threshold: f64) -> bool {
        self.incurred_current >= threshold
    }
}

/// Earned premium for a cohort at the current and prior evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumRow {
    pub class: String,
    pub cohort: String,
    pub earned: f64,
    pub prior_earned: f64,
}

/// Reported claim counts for a cohort at the current and prior evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimCountRow {
    pub class: String,
    pub cohort: String,
    pub count_current: f64,
    pub count_prior: f64,
}

/// Growth of `current` over `prior` as a fraction, `None` when prior is zero
pub fn growth_rate(current: f64, prior: f64) -> Option<f64> {
    if prior == 0.0 {
        None
    } else {
        Some((current - prior) / prior)
    }
}

/// The complete parsed dataset
///
/// Every collection defaults to empty so partially populated payloads load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    pub classes: Vec<String>,
    pub methods: Vec<String>,
    pub records: Vec<ClaimRecord>,
    pub ultimates: Vec<UltimateEstimate>,
    pub prior_ultimates: Vec<UltimateEstimate>,
    pub method_scores: Vec<MethodScore>,
    pub claims: Vec<ClaimMovement>,
    pub large_loss_thresholds: BTreeMap<String, f64>,
    pub premiums: Vec<PremiumRow>,
    pub cohort_claim_counts: Vec<ClaimCountRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_uses_original_column_names() {
        let json = r#"{"Class":"Motor","Cohort":"2022Q1","Development_Period":3,"Type":"Actual","Value":1250.5}"#;
        let record: ClaimRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.class, "Motor");
        assert_eq!(record.development_period, 3);
        assert_eq!(record.record_type, RecordType::Actual);
    }

    #[test]
    fn test_unknown_record_type_rejected() {
        let json = r#"{"Class":"Motor","Cohort":"2022Q1","Development_Period":3,"Type":"Paid","Value":1.0}"#;
        assert!(serde_json::from_str::<ClaimRecord>(json).is_err());
        assert_eq!(RecordType::parse("Paid"), None);
    }

    #[test]
    fn test_claim_movement_derived_fields() {
        let claim = ClaimMovement {
            class: "Motor".into(),
            cohort: "2022Q1".into(),
            claim_id: "C1".into(),
            status: "Open".into(),
            incurred_current: 260_000.0,
            incurred_prior: 200_000.0,
        };
        assert_eq!(claim.movement(), 60_000.0);
        assert!(claim.is_large(250_000.0));
        assert!(claim.is_large(260_000.0));
        assert!(!claim.is_large(260_000.01));
    }

    #[test]
    fn test_growth_rate_guards_zero_prior() {
        assert_eq!(growth_rate(120.0, 100.0), Some(0.2));
        assert_eq!(growth_rate(5.0, 0.0), None);
    }

    #[test]
    fn test_partial_payload_loads() {
        let dataset: Dataset = serde_json::from_str(r#"{"classes":["Motor"]}"#).unwrap();
        assert_eq!(dataset.classes, vec!["Motor".to_string()]);
        assert!(dataset.records.is_empty());
        assert!(dataset.large_loss_thresholds.is_empty());
    }
}
