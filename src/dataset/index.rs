//! Composite-key indices built once over an immutable dataset
//!
//! All lookups downstream go through these maps instead of scanning the flat
//! collections. A later duplicate key replaces an earlier one.

use super::{ClaimCountRow, ClaimMovement, Dataset, MethodScore, PremiumRow, UltimateEstimate};
use log::warn;
use std::collections::{BTreeSet, HashMap};

type CohortKey = (String, String);
type MethodKey = (String, String);
type UltimateKey = (String, String, String);

fn cohort_key(class: &str, cohort: &str) -> CohortKey {
    (class.to_string(), cohort.to_string())
}

fn method_key(class: &str, method: &str) -> MethodKey {
    (class.to_string(), method.to_string())
}

fn ultimate_key(class: &str, cohort: &str, method: &str) -> UltimateKey {
    (class.to_string(), cohort.to_string(), method.to_string())
}

/// Read-only indexed view of a [`Dataset`]
#[derive(Debug, Clone)]
pub struct DatasetIndex {
    dataset: Dataset,
    classes: BTreeSet<String>,
    /// Positions of the surviving row per key, into the matching dataset collection
    ultimates: HashMap<UltimateKey, usize>,
    prior_ultimates: HashMap<UltimateKey, usize>,
    scores: HashMap<MethodKey, usize>,
    premiums: HashMap<CohortKey, PremiumRow>,
    claim_counts: HashMap<CohortKey, ClaimCountRow>,
    /// Positions into `dataset.claims` per (class, cohort)
    claims: HashMap<CohortKey, Vec<usize>>,
}

impl DatasetIndex {
    /// Build every index in one pass over each collection
    pub fn new(dataset: Dataset) -> Self {
        let mut classes: BTreeSet<String> = dataset.classes.iter().cloned().collect();
        classes.extend(dataset.records.iter().map(|r| r.class.clone()));

        let ultimates = index_ultimates(&dataset.ultimates, "ultimate");
        let prior_ultimates = index_ultimates(&dataset.prior_ultimates, "prior ultimate");

        let mut scores = HashMap::new();
        for (i, score) in dataset.method_scores.iter().enumerate() {
            if scores
                .insert(method_key(&score.class, &score.method), i)
                .is_some()
            {
                warn!("Duplicate method score for {}/{}", score.class, score.method);
            }
        }

        let premiums = dataset
            .premiums
            .iter()
            .map(|p| (cohort_key(&p.class, &p.cohort), p.clone()))
            .collect();

        let claim_counts = dataset
            .cohort_claim_counts
            .iter()
            .map(|c| (cohort_key(&c.class, &c.cohort), c.clone()))
            .collect();

        let mut claims: HashMap<CohortKey, Vec<usize>> = HashMap::new();
        for (i, claim) in dataset.claims.iter().enumerate() {
            claims.entry(cohort_key(&claim.class, &claim.cohort)).or_default().push(i);
        }

        Self {
            dataset,
            classes,
            ultimates,
            prior_ultimates,
            scores,
            premiums,
            claim_counts,
            claims,
        }
    }

    /// The underlying dataset
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// All classes known to the dataset, sorted
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn ultimate_row(&self, class: &str, cohort: &str, method: &str) -> Option<&UltimateEstimate> {
        self.ultimates
            .get(&ultimate_key(class, cohort, method))
            .map(|&i| &self.dataset.ultimates[i])
    }

    pub fn prior_ultimate_row(&self, class: &str, cohort: &str, method: &str) -> Option<&UltimateEstimate> {
        self.prior_ultimates
            .get(&ultimate_key(class, cohort, method))
            .map(|&i| &self.dataset.prior_ultimates[i])
    }

    /// Current ultimates for a class, in dataset order, superseded duplicates skipped
    pub fn ultimates_for_class<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a UltimateEstimate> + 'a {
        surviving_ultimates(&self.dataset.ultimates, &self.ultimates, class)
    }

    /// Prior ultimates for a class, in dataset order, superseded duplicates skipped
    pub fn prior_ultimates_for_class<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a UltimateEstimate> + 'a {
        surviving_ultimates(&self.dataset.prior_ultimates, &self.prior_ultimates, class)
    }

    pub fn method_score(&self, class: &str, method: &str) -> Option<&MethodScore> {
        self.scores
            .get(&method_key(class, method))
            .map(|&i| &self.dataset.method_scores[i])
    }

    /// Method scores for a class, in dataset order, superseded duplicates skipped
    pub fn scores_for_class<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a MethodScore> + 'a {
        self.dataset
            .method_scores
            .iter()
            .enumerate()
            .filter(move |(i, s)| {
                s.class == class && self.scores.get(&method_key(&s.class, &s.method)) == Some(i)
            })
            .map(|(_, s)| s)
    }

    pub fn premium(&self, class: &str, cohort: &str) -> Option<&PremiumRow> {
        self.premiums.get(&cohort_key(class, cohort))
    }

    pub fn claim_count(&self, class: &str, cohort: &str) -> Option<&ClaimCountRow> {
        self.claim_counts.get(&cohort_key(class, cohort))
    }

    /// Claims of one cohort, in dataset order
    pub fn claims_for_cohort(&self, class: &str, cohort: &str) -> Vec<&ClaimMovement> {
        self.claims
            .get(&cohort_key(class, cohort))
            .map(|positions| positions.iter().map(|&i| &self.dataset.claims[i]).collect())
            .unwrap_or_default()
    }

    pub fn large_loss_threshold(&self, class: &str) -> Option<f64> {
        self.dataset.large_loss_thresholds.get(class).copied()
    }
}

fn index_ultimates(rows: &[UltimateEstimate], label: &str) -> HashMap<UltimateKey, usize> {
    let mut index = HashMap::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        if index
            .insert(ultimate_key(&row.class, &row.cohort, &row.method), i)
            .is_some()
        {
            warn!("Duplicate {} for {}/{}/{}", label, row.class, row.cohort, row.method);
        }
    }
    index
}

fn surviving_ultimates<'a>(
    rows: &'a [UltimateEstimate],
    index: &'a HashMap<UltimateKey, usize>,
    class: &'a str,
) -> impl Iterator<Item = &'a UltimateEstimate> + 'a {
    rows.iter()
        .enumerate()
        .filter(move |(i, u)| {
            u.class == class && index.get(&ultimate_key(&u.class, &u.cohort, &u.method)) == Some(i)
        })
        .map(|(_, u)| u)
}
