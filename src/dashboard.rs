//! Assemble every analytics view for one selection
//!
//! Holds the indexed dataset and configuration once, then derives views for
//! any number of selections without reloading.
//!
//! # Example
//! ```ignore
//! let dashboard = Dashboard::new(load_dataset("data/analytics.json")?, AnalysisConfig::default());
//! let view = dashboard.view(&ViewState::new("Motor", "Chain Ladder").with_threshold(0.6))?;
//! for row in &view.decisions {
//!     println!("{} {}", row.cohort, row.driver_label());
//! }
//! ```

use crate::analysis::{
    attribute, decision::decision_rows, detect_fanning, group_by_cohort, method_summaries,
    passing_methods, percent_of_ultimate, percent_of_year_one, ultimate_bands, ultimate_movements,
    Attribution, DecisionRow, DevelopmentSeries, GroupedSeries, MethodSummary, UltimateBand,
    UltimateMovement,
};
use crate::config::{AnalysisConfig, ViewState};
use crate::dataset::{Dataset, DatasetIndex};
use crate::error::{DashboardError, Result};
use log::debug;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Everything a presentation layer needs to render one selection
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub selection: ViewState,
    /// Actual and Expected series per cohort
    pub series: GroupedSeries,
    pub passing_methods: BTreeSet<String>,
    pub bands: BTreeMap<String, UltimateBand>,
    pub percent_of_ultimate: Vec<DevelopmentSeries>,
    pub percent_of_year_one: Vec<DevelopmentSeries>,
    pub fanning_of_ultimate: BTreeSet<String>,
    pub fanning_of_year_one: BTreeSet<String>,
    pub methods: Vec<MethodSummary>,
    pub ultimate_movements: Vec<UltimateMovement>,
    /// Selected cohort only, or every cohort when none is selected
    pub attributions: Vec<Attribution>,
    pub decisions: Vec<DecisionRow>,
}

impl DashboardView {
    /// Cohorts flagged in both normalizations
    pub fn fanning_both(&self) -> BTreeSet<String> {
        self.fanning_of_ultimate
            .intersection(&self.fanning_of_year_one)
            .cloned()
            .collect()
    }
}

/// Decision table for one (class, method) pair
#[derive(Debug, Clone, Serialize)]
pub struct MethodDecisions {
    pub class: String,
    pub method: String,
    pub rows: Vec<DecisionRow>,
}

/// Indexed dataset plus analysis configuration
#[derive(Debug, Clone)]
pub struct Dashboard {
    index: DatasetIndex,
    config: AnalysisConfig,
}

impl Dashboard {
    pub fn new(dataset: Dataset, config: AnalysisConfig) -> Self {
        Self {
            index: DatasetIndex::new(dataset),
            config,
        }
    }

    pub fn index(&self) -> &DatasetIndex {
        &self.index
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Reject selections that name data the dataset does not have
    pub fn validate(&self, view: &ViewState) -> Result<()> {
        if !self.index.has_class(&view.class) {
            return Err(DashboardError::UnknownClass(view.class.clone()));
        }
        let known_method = self.index.method_score(&view.class, &view.method).is_some()
            || self.index.methods_for_class(&view.class).contains(&view.method);
        if !known_method {
            return Err(DashboardError::UnknownMethod {
                class: view.class.clone(),
                method: view.method.clone(),
            });
        }
        if !(0.0..=1.0).contains(&view.quality_threshold) {
            return Err(DashboardError::InvalidThreshold(view.quality_threshold));
        }
        Ok(())
    }

    /// Derive every view for a selection
    pub fn view(&self, view: &ViewState) -> Result<DashboardView> {
        self.validate(view)?;
        let class = view.class.as_str();
        let method = view.method.as_str();

        let series = group_by_cohort(&self.index.dataset().records, class);
        let passing = passing_methods(&self.index, class, view.quality_threshold);
        let bands = ultimate_bands(&self.index, class, self.cohorts(class, &series).iter(), &passing);

        let pct_ultimate = percent_of_ultimate(&self.index, &series, class, method);
        let pct_year_one = percent_of_year_one(&series, self.config.base_development_period);
        let fanning_of_ultimate = detect_fanning(&pct_ultimate, self.config.fanning_deviation_pct);
        let fanning_of_year_one = detect_fanning(&pct_year_one, self.config.fanning_deviation_pct);
        let fanning_both: BTreeSet<String> = fanning_of_ultimate
            .intersection(&fanning_of_year_one)
            .cloned()
            .collect();

        let decisions = decision_rows(&self.index, &series, &self.config, view, &fanning_both);

        let attributions = match &view.selected_cohort {
            Some(cohort) => vec![attribute(&self.index, class, cohort)],
            None => series.keys().map(|cohort| attribute(&self.index, class, cohort)).collect(),
        };

        debug!(
            "View {}/{} @ {:.2}: {} cohorts, {} passing methods, {} fanning in both",
            class,
            method,
            view.quality_threshold,
            series.len(),
            passing.len(),
            fanning_both.len()
        );

        Ok(DashboardView {
            selection: view.clone(),
            series,
            passing_methods: passing,
            bands,
            percent_of_ultimate: pct_ultimate,
            percent_of_year_one: pct_year_one,
            fanning_of_ultimate,
            fanning_of_year_one,
            methods: method_summaries(&self.index, class, view.quality_threshold),
            ultimate_movements: ultimate_movements(&self.index, class, method),
            attributions,
            decisions,
        })
    }

    /// Decision tables for every class and method, evaluated in parallel
    pub fn decision_tables(&self, quality_threshold: f64) -> Result<Vec<MethodDecisions>> {
        let selections: Vec<ViewState> = self
            .index
            .classes()
            .flat_map(|class| {
                self.index
                    .methods_for_class(class)
                    .into_iter()
                    .map(move |method| ViewState::new(class, method).with_threshold(quality_threshold))
            })
            .collect();

        selections
            .par_iter()
            .map(|selection| {
                let view = self.view(selection)?;
                Ok(MethodDecisions {
                    class: selection.class.clone(),
                    method: selection.method.clone(),
                    rows: view.decisions,
                })
            })
            .collect()
    }

    /// Cohorts with development records or an ultimate estimate
    fn cohorts(&self, class: &str, series: &GroupedSeries) -> BTreeSet<String> {
        let mut cohorts: BTreeSet<String> = series.keys().cloned().collect();
        cohorts.extend(self.index.ultimates_for_class(class).map(|u| u.cohort.clone()));
        cohorts
    }
}
