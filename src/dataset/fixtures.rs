//! Small hand-built dataset shared by unit tests

use super::*;
use std::collections::BTreeMap;

pub const CHAIN_LADDER: &str = "Chain Ladder";
pub const BF: &str = "Bornhuetter-Ferguson";
pub const ELR: &str = "Expected Loss Ratio";

fn record(class: &str, cohort: &str, dp: u32, record_type: RecordType, value: f64) -> ClaimRecord {
    ClaimRecord {
        class: class.to_string(),
        cohort: cohort.to_string(),
        development_period: dp,
        record_type,
        value,
    }
}

fn ultimate(cohort: &str, method: &str, value: f64, method_type: MethodType) -> UltimateEstimate {
    UltimateEstimate {
        class: "Motor".to_string(),
        cohort: cohort.to_string(),
        method: method.to_string(),
        value,
        method_type,
    }
}

fn score(method: &str, quality: f64, determinism: f64) -> MethodScore {
    MethodScore {
        class: "Motor".to_string(),
        method: method.to_string(),
        reserve_determinism: determinism,
        prior_reserve_determinism: determinism - 0.05,
        projection_quality: quality,
        pattern: "Stable".to_string(),
        incurred_vs_expected: "In line".to_string(),
        approach: "Deterministic".to_string(),
        shap_contributions: BTreeMap::from([("volatility".to_string(), -0.1)]),
    }
}

fn claim(cohort: &str, id: &str, current: f64, prior: f64) -> ClaimMovement {
    ClaimMovement {
        class: "Motor".to_string(),
        cohort: cohort.to_string(),
        claim_id: id.to_string(),
        status: "Open".to_string(),
        incurred_current: current,
        incurred_prior: prior,
    }
}

/// Motor: four developed cohorts plus 2023Q1 with only an Expected point.
/// 2022Q4 fans out in both normalizations; 2022Q3 sits within tolerance.
pub fn motor_dataset() -> Dataset {
    use MethodType::{ClaimsBased, PremiumBased};
    use RecordType::{Actual, Expected};

    let actuals: [(&str, &[f64], f64); 4] = [
        ("2022Q1", &[0.0, 30.0, 50.0, 65.0, 80.0, 92.0, 102.0, 110.0], 150.0),
        ("2022Q2", &[0.0, 28.0, 48.0, 62.0, 76.0, 88.0, 98.0], 150.0),
        ("2022Q3", &[0.0, 30.0, 52.0, 66.0, 80.0, 90.0], 140.0),
        ("2022Q4", &[0.0, 40.0, 70.0, 95.0, 100.0, 135.0], 140.0),
    ];

    let mut records = Vec::new();
    // Newest first and descending periods so grouping has to sort
    for (cohort, values, e2u) in actuals.iter().rev() {
        for (dp, value) in values.iter().enumerate().rev() {
            records.push(record("Motor", cohort, dp as u32, Actual, *value));
        }
        records.push(record("Motor", cohort, 0, Expected, *e2u));
    }
    records.push(record("Motor", "2023Q1", 0, Expected, 160.0));
    for (dp, value) in [0.0, 10.0, 20.0].iter().enumerate() {
        records.push(record("Property", "2022Q1", dp as u32, Actual, *value));
    }
    records.push(record("Property", "2022Q1", 0, Expected, 50.0));

    let ultimates = vec![
        ultimate("2022Q1", CHAIN_LADDER, 130.0, ClaimsBased),
        ultimate("2022Q2", CHAIN_LADDER, 125.0, ClaimsBased),
        ultimate("2022Q3", CHAIN_LADDER, 128.0, ClaimsBased),
        ultimate("2022Q4", CHAIN_LADDER, 150.0, ClaimsBased),
        ultimate("2023Q1", CHAIN_LADDER, 160.0, ClaimsBased),
        ultimate("2022Q1", BF, 140.0, ClaimsBased),
        ultimate("2022Q2", BF, 135.0, ClaimsBased),
        ultimate("2022Q3", BF, 132.0, ClaimsBased),
        ultimate("2022Q4", BF, 142.0, ClaimsBased),
        ultimate("2022Q1", ELR, 150.0, PremiumBased),
        ultimate("2022Q2", ELR, 150.0, PremiumBased),
        ultimate("2022Q3", ELR, 140.0, PremiumBased),
        ultimate("2022Q4", ELR, 140.0, PremiumBased),
    ];

    let prior_ultimates = vec![
        ultimate("2022Q1", CHAIN_LADDER, 125.0, ClaimsBased),
        ultimate("2022Q2", CHAIN_LADDER, 125.0, ClaimsBased),
        ultimate("2022Q3", CHAIN_LADDER, 120.0, ClaimsBased),
        ultimate("2022Q1", ELR, 150.0, PremiumBased),
    ];

    let method_scores = vec![
        score(CHAIN_LADDER, 0.9, 0.8),
        score(BF, 0.6, 0.5),
        score(ELR, 0.3, 0.3),
    ];

    let claims = vec![
        claim("2022Q1", "M-001", 80.0, 40.0),
        claim("2022Q1", "M-002", 60.0, 55.0),
        claim("2022Q1", "M-003", 20.0, 10.0),
        claim("2022Q1", "M-004", 15.0, 20.0),
        claim("2022Q2", "M-005", 30.0, 20.0),
        claim("2022Q2", "M-006", 25.0, 15.0),
    ];

    let premiums = vec![
        PremiumRow { class: "Motor".into(), cohort: "2022Q1".into(), earned: 200.0, prior_earned: 200.0 },
        PremiumRow { class: "Motor".into(), cohort: "2022Q2".into(), earned: 210.0, prior_earned: 200.0 },
        PremiumRow { class: "Motor".into(), cohort: "2022Q3".into(), earned: 220.0, prior_earned: 180.0 },
    ];

    let cohort_claim_counts = vec![
        ClaimCountRow { class: "Motor".into(), cohort: "2022Q1".into(), count_current: 105.0, count_prior: 100.0 },
        ClaimCountRow { class: "Motor".into(), cohort: "2022Q2".into(), count_current: 120.0, count_prior: 100.0 },
        ClaimCountRow { class: "Motor".into(), cohort: "2022Q3".into(), count_current: 100.0, count_prior: 100.0 },
    ];

    Dataset {
        title: Some("Test".to_string()),
        subtitle: None,
        last_updated: None,
        classes: vec!["Motor".to_string(), "Property".to_string()],
        methods: vec![CHAIN_LADDER.to_string(), BF.to_string(), ELR.to_string()],
        records,
        ultimates,
        prior_ultimates,
        method_scores,
        claims,
        large_loss_thresholds: BTreeMap::from([("Motor".to_string(), 50.0)]),
        premiums,
        cohort_claim_counts,
    }
}
