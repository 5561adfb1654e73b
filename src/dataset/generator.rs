//! Deterministic synthetic reserving dataset
//!
//! Produces a complete dashboard payload: long-format Actual/Expected
//! development records plus the method ultimates, quality scores, claim
//! movements, premiums and claim counts the analytics consume.
//!
//! Actual development follows a shifted exponential CDF
//! `ult * (1 - exp(-speed * dp))` with cumulative normal noise (zero at the
//! origin), clamped at zero and forced monotone. Expected rows stay flat at
//! the origin E2U rounded to the nearest 1,000.

use super::{
    ClaimCountRow, ClaimMovement, ClaimRecord, Dataset, MethodScore, MethodType, PremiumRow,
    RecordType, UltimateEstimate,
};
use crate::error::{DashboardError, Result};
use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rand_distr::{Distribution, LogNormal, Normal};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Generation parameters for one line of business
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassParams {
    pub name: String,
    /// Ultimate of the 2022Q1 cohort before growth and noise
    pub base_ultimate: f64,
    /// Annual growth of cohort ultimates
    pub growth_rate: f64,
    /// Exponential development speed (higher = faster)
    pub dev_speed: f64,
    /// Relative noise on ultimates and development
    pub volatility: f64,
}

/// A reserving method and the family it belongs to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodSpec {
    pub name: String,
    pub method_type: MethodType,
}

/// Configuration for [`generate_dataset`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub seed: u64,
    /// Quarters of development tracked
    pub max_development_period: u32,
    /// Current valuation quarter, e.g. "2026Q1"
    pub valuation_date: String,
    pub cohorts: Vec<String>,
    pub classes: Vec<ClassParams>,
    pub methods: Vec<MethodSpec>,
    /// Individual claims simulated per cohort
    pub claims_per_cohort: usize,
    /// Target loss ratio used to back out earned premium
    pub loss_ratio: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let class = |name: &str, base_ultimate, growth_rate, dev_speed, volatility| ClassParams {
            name: name.to_string(),
            base_ultimate,
            growth_rate,
            dev_speed,
            volatility,
        };
        let method = |name: &str, method_type| MethodSpec {
            name: name.to_string(),
            method_type,
        };

        let cohorts = (2022..=2025)
            .flat_map(|year| (1..=4).map(move |q| format!("{}Q{}", year, q)))
            .take(13)
            .collect();

        Self {
            seed: 42,
            max_development_period: 12,
            valuation_date: "2026Q1".to_string(),
            cohorts,
            classes: vec![
                class("Motor", 1_200_000.0, 0.04, 0.22, 0.03),
                class("Property", 900_000.0, 0.06, 0.30, 0.04),
                // Long-tail class
                class("Liability", 1_500_000.0, 0.03, 0.15, 0.05),
            ],
            methods: vec![
                method("Chain Ladder", MethodType::ClaimsBased),
                method("Bornhuetter-Ferguson", MethodType::ClaimsBased),
                method("Expected Loss Ratio", MethodType::PremiumBased),
                method("Cape Cod", MethodType::PremiumBased),
            ],
            claims_per_cohort: 12,
            loss_ratio: 0.65,
        }
    }
}

/// Quarter offset of a `YYYYQn` label from 2022Q1
pub fn cohort_index(cohort: &str) -> Result<i64> {
    let invalid = || DashboardError::Generator(format!("cohort label `{}` is not YYYYQn", cohort));

    let (year, quarter) = cohort.split_once('Q').ok_or_else(invalid)?;
    let year: i64 = year.parse().map_err(|_| invalid())?;
    let quarter: i64 = quarter.parse().map_err(|_| invalid())?;
    if !(1..=4).contains(&quarter) {
        return Err(invalid());
    }
    Ok((year - 2022) * 4 + (quarter - 1))
}

/// Cumulative development `ult * (1 - exp(-speed * dp))`
pub fn cumulative_development(dp: u32, ultimate: f64, speed: f64) -> f64 {
    ultimate * (1.0 - (-speed * dp as f64).exp())
}

fn normal(mean: f64, std_dev: f64) -> Result<Normal<f64>> {
    Normal::new(mean, std_dev).map_err(|e| DashboardError::Generator(e.to_string()))
}

/// Per-cohort values shared between the record and ultimate generators
struct CohortFacts {
    cohort: String,
    true_ultimate: f64,
    expected_ultimate: f64,
    latest_actual: f64,
    developed: f64,
}

/// Generate the full synthetic dataset
pub fn generate_dataset(config: &GeneratorConfig) -> Result<Dataset> {
    if config.loss_ratio.is_nan() || config.loss_ratio <= 0.0 {
        return Err(DashboardError::Generator(format!(
            "loss ratio must be positive, got {}",
            config.loss_ratio
        )));
    }
    let mut rng = ChaCha20Rng::seed_from_u64(config.seed);
    let val_idx = cohort_index(&config.valuation_date)?;

    let mut dataset = Dataset {
        title: Some("Insurance Analytics Dashboard".to_string()),
        subtitle: Some("A vs E Flight Path: Actual vs Expected to Ultimate".to_string()),
        last_updated: Some(chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()),
        methods: config.methods.iter().map(|m| m.name.clone()).collect(),
        ..Default::default()
    };

    for params in &config.classes {
        let mut facts = Vec::new();

        for cohort in &config.cohorts {
            let c_idx = cohort_index(cohort)?;
            let observed = val_idx - c_idx;
            if observed < 0 {
                debug!("Cohort {} starts after valuation, skipped", cohort);
                continue;
            }
            let max_observed = observed.min(config.max_development_period as i64) as u32;

            let growth = (1.0 + params.growth_rate).powf(c_idx as f64 / 4.0);
            let noise = normal(1.0, params.volatility)?.sample(&mut rng);
            let true_ultimate = params.base_ultimate * growth * noise;
            let expected_ultimate = (true_ultimate / 1000.0).round() * 1000.0;

            let perturbation = normal(0.0, params.volatility * true_ultimate * 0.02)?;
            let mut drift = 0.0;
            let mut running_max: f64 = 0.0;

            for dp in 0..=max_observed {
                if dp > 0 {
                    drift += perturbation.sample(&mut rng);
                }
                let value = (cumulative_development(dp, true_ultimate, params.dev_speed) + drift).max(0.0);
                running_max = running_max.max(value);

                dataset.records.push(ClaimRecord {
                    class: params.name.clone(),
                    cohort: cohort.clone(),
                    development_period: dp,
                    record_type: RecordType::Actual,
                    value: (running_max * 100.0).round() / 100.0,
                });
            }

            for dp in 0..=max_observed {
                dataset.records.push(ClaimRecord {
                    class: params.name.clone(),
                    cohort: cohort.clone(),
                    development_period: dp,
                    record_type: RecordType::Expected,
                    value: expected_ultimate,
                });
            }

            facts.push(CohortFacts {
                cohort: cohort.clone(),
                true_ultimate,
                expected_ultimate,
                latest_actual: running_max,
                developed: 1.0 - (-params.dev_speed * max_observed as f64).exp(),
            });
        }

        generate_ultimates(&mut rng, config, params, &facts, &mut dataset)?;
        generate_scores(&mut rng, config, params, &mut dataset);
        generate_claims(&mut rng, config, params, &facts, &mut dataset)?;
        generate_exposure(&mut rng, config, params, &facts, &mut dataset)?;
        dataset.classes.push(params.name.clone());
    }

    dataset.classes.sort();
    Ok(dataset)
}

fn generate_ultimates(
    rng: &mut ChaCha20Rng,
    config: &GeneratorConfig,
    params: &ClassParams,
    facts: &[CohortFacts],
    dataset: &mut Dataset,
) -> Result<()> {
    let method_noise = normal(1.0, params.volatility)?;
    let prior_noise = normal(1.0, params.volatility / 2.0)?;

    for fact in facts {
        for (i, method) in config.methods.iter().enumerate() {
            let projected = match (method.method_type, i % 2) {
                // Development-driven projection
                (MethodType::ClaimsBased, 0) if fact.developed > 0.05 => fact.latest_actual / fact.developed,
                // Credibility blend of actual and expected
                (MethodType::ClaimsBased, _) => {
                    fact.latest_actual + (1.0 - fact.developed) * fact.expected_ultimate
                }
                (MethodType::PremiumBased, 0) => fact.expected_ultimate,
                (MethodType::PremiumBased, _) => 0.5 * (fact.expected_ultimate + fact.true_ultimate),
            };
            let value = (projected * method_noise.sample(rng)).max(0.0);

            let row = UltimateEstimate {
                class: params.name.clone(),
                cohort: fact.cohort.clone(),
                method: method.name.clone(),
                value,
                method_type: method.method_type,
            };
            let mut prior = row.clone();
            prior.value = value * prior_noise.sample(rng);

            dataset.ultimates.push(row);
            dataset.prior_ultimates.push(prior);
        }
    }
    Ok(())
}

fn generate_scores(rng: &mut ChaCha20Rng, config: &GeneratorConfig, params: &ClassParams, dataset: &mut Dataset) {
    const PATTERNS: [&str; 3] = ["Stable", "Accelerating", "Volatile"];
    const IVE: [&str; 3] = ["In line", "Above expected", "Below expected"];

    for method in &config.methods {
        let determinism: f64 = rng.random_range(0.3..0.95);
        let shap = BTreeMap::from([
            ("development_stability".to_string(), rng.random_range(-0.2..0.2)),
            ("volatility".to_string(), -params.volatility * rng.random_range(1.0..3.0)),
            ("data_volume".to_string(), rng.random_range(0.0..0.15)),
        ]);

        dataset.method_scores.push(MethodScore {
            class: params.name.clone(),
            method: method.name.clone(),
            reserve_determinism: determinism,
            prior_reserve_determinism: (determinism + rng.random_range(-0.1..0.1)).clamp(0.0, 1.0),
            projection_quality: rng.random_range(0.2..0.95),
            pattern: PATTERNS[rng.random_range(0..PATTERNS.len())].to_string(),
            incurred_vs_expected: IVE[rng.random_range(0..IVE.len())].to_string(),
            approach: match method.method_type {
                MethodType::ClaimsBased => "Development".to_string(),
                MethodType::PremiumBased => "Exposure".to_string(),
            },
            shap_contributions: shap,
        });
    }
}

fn generate_claims(
    rng: &mut ChaCha20Rng,
    config: &GeneratorConfig,
    params: &ClassParams,
    facts: &[CohortFacts],
    dataset: &mut Dataset,
) -> Result<()> {
    if config.claims_per_cohort == 0 {
        return Ok(());
    }
    let threshold = params.base_ultimate * 0.05;
    let prefix = params.name.chars().next().unwrap_or('X');
    dataset.large_loss_thresholds.insert(params.name.clone(), threshold);

    for fact in facts {
        // Median claim sized so the cohort total is near the latest actual
        let median = (fact.latest_actual / config.claims_per_cohort as f64).max(1.0);
        let severity = LogNormal::new(median.ln(), 0.9).map_err(|e| DashboardError::Generator(e.to_string()))?;

        for n in 0..config.claims_per_cohort {
            let current: f64 = severity.sample(rng);
            let prior = current * rng.random_range(0.6..1.05);
            let status = if rng.random_bool(0.3) { "Closed" } else { "Open" };

            dataset.claims.push(ClaimMovement {
                class: params.name.clone(),
                cohort: fact.cohort.clone(),
                claim_id: format!("{}-{}-{:03}", prefix, fact.cohort, n + 1),
                status: status.to_string(),
                incurred_current: (current * 100.0).round() / 100.0,
                incurred_prior: (prior * 100.0).round() / 100.0,
            });
        }
    }
    Ok(())
}

fn generate_exposure(
    rng: &mut ChaCha20Rng,
    config: &GeneratorConfig,
    params: &ClassParams,
    facts: &[CohortFacts],
    dataset: &mut Dataset,
) -> Result<()> {
    let premium_growth = normal(0.03, 0.05)?;
    let count_growth = normal(0.04, 0.08)?;

    for fact in facts {
        let earned = fact.expected_ultimate / config.loss_ratio;
        dataset.premiums.push(PremiumRow {
            class: params.name.clone(),
            cohort: fact.cohort.clone(),
            earned,
            prior_earned: earned / (1.0 + premium_growth.sample(rng)).max(0.5),
        });

        let count_current = (fact.latest_actual / (params.base_ultimate * 0.002)).round();
        let count_prior = (count_current / (1.0 + count_growth.sample(rng)).max(0.5)).round();
        dataset.cohort_claim_counts.push(ClaimCountRow {
            class: params.name.clone(),
            cohort: fact.cohort.clone(),
            count_current,
            count_prior,
        });
    }
    Ok(())
}
