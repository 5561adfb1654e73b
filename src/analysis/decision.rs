//! Reserving decision rules
//!
//! An ordered table of (predicate, driver) rules evaluated fresh for each
//! cohort; the first matching rule wins. The standard table is:
//!
//! 1. A-vs-E within tolerance (or unavailable): no signal
//! 2. Fanning in both normalizations: trend acceleration
//! 3. Claim count growth: claim frequency
//! 4. Large-loss share of movement: large losses
//! 5. Premium growth: premium growth
//! 6. Premium-based method below the best claims-based ultimate: method mismatch
//! 7. Otherwise: unclear, manual review

use super::attribution::attribute;
use super::development::ae_comparison;
use super::grouping::{CohortSeries, GroupedSeries};
use super::quality::ScoreBucket;
use super::ultimates::change_pct;
use crate::config::{AnalysisConfig, DecisionThresholds, ViewState};
use crate::dataset::{growth_rate, DatasetIndex, MethodType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Likely cause of an actionable A-vs-E movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Driver {
    TrendAcceleration,
    ClaimFrequency,
    LargeLosses,
    PremiumGrowth,
    MethodMismatch,
    Unclear,
}

impl Driver {
    pub fn label(&self) -> &'static str {
        match self {
            Driver::TrendAcceleration => "Trend acceleration",
            Driver::ClaimFrequency => "Claim frequency",
            Driver::LargeLosses => "Large losses",
            Driver::PremiumGrowth => "Premium growth",
            Driver::MethodMismatch => "Method mismatch",
            Driver::Unclear => "Unclear",
        }
    }

    pub fn suggestion(&self) -> &'static str {
        match self {
            Driver::TrendAcceleration => {
                "Recent cohorts are developing faster than history; revisit the development pattern and consider strengthening IBNR."
            }
            Driver::ClaimFrequency => {
                "Reported claim counts have grown; review frequency and exposure assumptions before moving the ultimate."
            }
            Driver::LargeLosses => {
                "Movement is concentrated in large claims; review large-loss case reserves and exclude them from pattern selection."
            }
            Driver::PremiumGrowth => {
                "Earned premium has grown; re-base the expected loss ratio on current exposure rather than changing development."
            }
            Driver::MethodMismatch => {
                "A claims-based method projects above the selected premium-based ultimate; consider a claims-based selection."
            }
            Driver::Unclear => "No single driver identified; refer for manual review.",
        }
    }
}

/// Per-cohort signals a rule can inspect
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecisionInputs {
    /// `(actual - expected) / expected` at the latest actual point
    pub ae_ratio: Option<f64>,
    /// Fanning flagged in both % of ultimate and % of year 1
    pub is_fanning_both: bool,
    /// Claim count growth vs prior, as a fraction
    pub claim_count_growth: Option<f64>,
    /// Large-loss share of movement, in percent
    pub large_loss_pct: f64,
    /// Earned premium growth vs prior, as a fraction
    pub premium_growth: Option<f64>,
    pub method_type: Option<MethodType>,
    pub selected_ultimate: Option<f64>,
    pub max_claims_based_ultimate: Option<f64>,
}

pub type RulePredicate = fn(&DecisionInputs, &DecisionThresholds) -> bool;

/// One row of the decision table
#[derive(Clone, Copy)]
pub struct DecisionRule {
    pub name: &'static str,
    pub predicate: RulePredicate,
    /// `None` marks a "no signal" outcome
    pub driver: Option<Driver>,
}

impl fmt::Debug for DecisionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecisionRule")
            .field("name", &self.name)
            .field("driver", &self.driver)
            .finish()
    }
}

fn within_tolerance(i: &DecisionInputs, t: &DecisionThresholds) -> bool {
    i.ae_ratio.map_or(true, |r| r.abs() <= t.ae_tolerance)
}

fn fanning_both(i: &DecisionInputs, _: &DecisionThresholds) -> bool {
    i.is_fanning_both
}

fn claim_frequency(i: &DecisionInputs, t: &DecisionThresholds) -> bool {
    i.claim_count_growth.is_some_and(|g| g >= t.claim_count_growth)
}

fn large_losses(i: &DecisionInputs, t: &DecisionThresholds) -> bool {
    i.large_loss_pct >= t.large_loss_share_pct
}

fn premium_growth(i: &DecisionInputs, t: &DecisionThresholds) -> bool {
    i.premium_growth.is_some_and(|g| g >= t.premium_growth)
}

fn method_mismatch(i: &DecisionInputs, _: &DecisionThresholds) -> bool {
    i.method_type == Some(MethodType::PremiumBased)
        && matches!(
            (i.max_claims_based_ultimate, i.selected_ultimate),
            (Some(best), Some(selected)) if best > selected
        )
}

fn always(_: &DecisionInputs, _: &DecisionThresholds) -> bool {
    true
}

/// The reference rule table, in evaluation order
pub fn standard_rules() -> Vec<DecisionRule> {
    vec![
        DecisionRule { name: "within_tolerance", predicate: within_tolerance, driver: None },
        DecisionRule { name: "fanning_both", predicate: fanning_both, driver: Some(Driver::TrendAcceleration) },
        DecisionRule { name: "claim_frequency", predicate: claim_frequency, driver: Some(Driver::ClaimFrequency) },
        DecisionRule { name: "large_losses", predicate: large_losses, driver: Some(Driver::LargeLosses) },
        DecisionRule { name: "premium_growth", predicate: premium_growth, driver: Some(Driver::PremiumGrowth) },
        DecisionRule { name: "method_mismatch", predicate: method_mismatch, driver: Some(Driver::MethodMismatch) },
        DecisionRule { name: "unclear", predicate: always, driver: Some(Driver::Unclear) },
    ]
}

/// First-match rule evaluator
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    rules: Vec<DecisionRule>,
    thresholds: DecisionThresholds,
}

impl DecisionEngine {
    /// Engine with the standard rule table
    pub fn new(thresholds: DecisionThresholds) -> Self {
        Self::with_rules(standard_rules(), thresholds)
    }

    pub fn with_rules(rules: Vec<DecisionRule>, thresholds: DecisionThresholds) -> Self {
        Self { rules, thresholds }
    }

    pub fn rules(&self) -> &[DecisionRule] {
        &self.rules
    }

    /// Insert a rule ahead of the rule currently at `position`
    pub fn insert_rule(&mut self, position: usize, rule: DecisionRule) {
        let position = position.min(self.rules.len());
        self.rules.insert(position, rule);
    }

    /// The first matching rule, if any
    pub fn matching_rule(&self, inputs: &DecisionInputs) -> Option<&DecisionRule> {
        self.rules.iter().find(|rule| (rule.predicate)(inputs, &self.thresholds))
    }

    /// Driver of the first matching rule; `None` means no signal
    pub fn evaluate(&self, inputs: &DecisionInputs) -> Option<Driver> {
        self.matching_rule(inputs).and_then(|rule| rule.driver)
    }
}

/// Decision table row for one cohort
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRow {
    pub cohort: String,
    pub ae_ratio: Option<f64>,
    pub ultimate_change_pct: Option<f64>,
    pub reserve_det_bucket: Option<ScoreBucket>,
    pub quality_bucket: Option<ScoreBucket>,
    pub is_fanning_both: bool,
    pub method_type: Option<MethodType>,
    pub driver: Option<Driver>,
    /// Empty when there is no signal
    pub suggestion: String,
}

impl DecisionRow {
    /// Driver label, empty when there is no signal
    pub fn driver_label(&self) -> &'static str {
        self.driver.map_or("", |d| d.label())
    }
}

/// Gather the rule inputs for one cohort under the selected method
pub fn cohort_inputs(
    index: &DatasetIndex,
    class: &str,
    method: &str,
    cohort: &str,
    series: &CohortSeries,
    max_development_period: u32,
    fanning_both: &BTreeSet<String>,
) -> DecisionInputs {
    DecisionInputs {
        ae_ratio: ae_comparison(series, max_development_period).map(|ae| ae.ratio),
        is_fanning_both: fanning_both.contains(cohort),
        claim_count_growth: index
            .claim_count(class, cohort)
            .and_then(|c| growth_rate(c.count_current, c.count_prior)),
        large_loss_pct: attribute(index, class, cohort).large_pct,
        premium_growth: index
            .premium(class, cohort)
            .and_then(|p| growth_rate(p.earned, p.prior_earned)),
        method_type: index.method_type(class, method),
        selected_ultimate: index.ultimate(class, cohort, method),
        max_claims_based_ultimate: index.max_ultimate_of_type(class, cohort, MethodType::ClaimsBased),
    }
}

/// Decision rows for every cohort with at least one actual point
pub fn decision_rows(
    index: &DatasetIndex,
    grouped: &GroupedSeries,
    config: &AnalysisConfig,
    view: &ViewState,
    fanning_both: &BTreeSet<String>,
) -> Vec<DecisionRow> {
    let engine = DecisionEngine::new(config.decision);
    let score = index.method_score(&view.class, &view.method);

    grouped
        .iter()
        .filter(|(_, series)| !series.actual.is_empty())
        .map(|(cohort, series)| {
            let inputs = cohort_inputs(
                index,
                &view.class,
                &view.method,
                cohort,
                series,
                config.max_development_period,
                fanning_both,
            );
            let driver = engine.evaluate(&inputs);

            DecisionRow {
                cohort: cohort.clone(),
                ae_ratio: inputs.ae_ratio,
                ultimate_change_pct: change_pct(
                    index.ultimate(&view.class, cohort, &view.method),
                    index.prior_ultimate(&view.class, cohort, &view.method),
                ),
                reserve_det_bucket: score
                    .map(|s| ScoreBucket::from_score(s.reserve_determinism, &config.buckets)),
                quality_bucket: score.map(|s| ScoreBucket::from_score(s.projection_quality, &config.buckets)),
                is_fanning_both: inputs.is_fanning_both,
                method_type: inputs.method_type,
                driver,
                suggestion: driver.map_or(String::new(), |d| d.suggestion().to_string()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adverse() -> DecisionInputs {
        DecisionInputs {
            ae_ratio: Some(0.12),
            ..Default::default()
        }
    }

    fn engine() -> DecisionEngine {
        DecisionEngine::new(DecisionThresholds::default())
    }

    #[test]
    fn test_within_tolerance_short_circuits_everything() {
        let inputs = DecisionInputs {
            ae_ratio: Some(-0.022),
            is_fanning_both: true,
            claim_count_growth: Some(0.5),
            large_loss_pct: 90.0,
            premium_growth: Some(0.3),
            method_type: Some(MethodType::PremiumBased),
            selected_ultimate: Some(100.0),
            max_claims_based_ultimate: Some(200.0),
        };
        assert_eq!(engine().evaluate(&inputs), None);
        assert_eq!(engine().matching_rule(&inputs).unwrap().name, "within_tolerance");
    }

    #[test]
    fn test_tolerance_boundary_inclusive() {
        let mut inputs = adverse();
        inputs.ae_ratio = Some(0.05);
        assert_eq!(engine().evaluate(&inputs), None);
        inputs.ae_ratio = Some(-0.0501);
        assert_eq!(engine().evaluate(&inputs), Some(Driver::Unclear));
    }

    #[test]
    fn test_missing_ratio_is_no_signal() {
        let inputs = DecisionInputs {
            is_fanning_both: true,
            ..Default::default()
        };
        assert_eq!(engine().evaluate(&inputs), None);
    }

    #[test]
    fn test_fanning_beats_frequency() {
        let inputs = DecisionInputs {
            is_fanning_both: true,
            claim_count_growth: Some(0.5),
            ..adverse()
        };
        assert_eq!(engine().evaluate(&inputs), Some(Driver::TrendAcceleration));
    }

    #[test]
    fn test_claim_count_scenario() {
        let inputs = DecisionInputs {
            claim_count_growth: growth_rate(120.0, 100.0),
            ..adverse()
        };
        assert_eq!(engine().evaluate(&inputs), Some(Driver::ClaimFrequency));
    }

    #[test]
    fn test_rule_order_after_frequency() {
        let large = DecisionInputs {
            claim_count_growth: Some(0.14),
            large_loss_pct: 50.0,
            premium_growth: Some(0.2),
            ..adverse()
        };
        assert_eq!(engine().evaluate(&large), Some(Driver::LargeLosses));

        let premium = DecisionInputs {
            large_loss_pct: 49.9,
            premium_growth: Some(0.10),
            ..large.clone()
        };
        assert_eq!(engine().evaluate(&premium), Some(Driver::PremiumGrowth));
    }

    #[test]
    fn test_method_mismatch_needs_premium_based_selection() {
        let mismatch = DecisionInputs {
            method_type: Some(MethodType::PremiumBased),
            selected_ultimate: Some(140.0),
            max_claims_based_ultimate: Some(150.0),
            ..adverse()
        };
        assert_eq!(engine().evaluate(&mismatch), Some(Driver::MethodMismatch));

        let claims_based = DecisionInputs {
            method_type: Some(MethodType::ClaimsBased),
            ..mismatch.clone()
        };
        assert_eq!(engine().evaluate(&claims_based), Some(Driver::Unclear));

        let no_claims_estimate = DecisionInputs {
            max_claims_based_ultimate: None,
            ..mismatch
        };
        assert_eq!(engine().evaluate(&no_claims_estimate), Some(Driver::Unclear));
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = DecisionThresholds {
            ae_tolerance: 0.2,
            ..Default::default()
        };
        assert_eq!(DecisionEngine::new(thresholds).evaluate(&adverse()), None);
    }

    #[test]
    fn test_inserted_rule_takes_precedence() {
        fn severe(i: &DecisionInputs, _: &DecisionThresholds) -> bool {
            i.ae_ratio.is_some_and(|r| r > 0.1)
        }
        let mut engine = engine();
        engine.insert_rule(1, DecisionRule { name: "severe", predicate: severe, driver: Some(Driver::Unclear) });
        let inputs = DecisionInputs {
            is_fanning_both: true,
            ..adverse()
        };
        assert_eq!(engine.matching_rule(&inputs).unwrap().name, "severe");
        assert_eq!(engine.rules().len(), 8);
    }

    #[test]
    fn test_every_driver_has_text() {
        for rule in standard_rules() {
            if let Some(driver) = rule.driver {
                assert!(!driver.label().is_empty());
                assert!(!driver.suggestion().is_empty());
            }
        }
    }
}
