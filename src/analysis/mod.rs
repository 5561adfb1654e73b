//! Flight path analytics: grouping, normalization, trend signals and decisions
//!
//! Every function here is a pure derivation from a [`DatasetIndex`] plus
//! explicit configuration and selection; nothing reads shared mutable state.

mod grouping;
mod ultimates;
mod quality;
mod development;
mod fanning;
mod attribution;
mod methods;
pub mod decision;

pub use grouping::{group_by_cohort, CohortSeries, DevelopmentPoint, GroupedSeries};
pub use ultimates::{change_pct, ultimate_movements, UltimateMovement};
pub use quality::{passing_methods, ultimate_band, ultimate_bands, ScoreBucket, UltimateBand};
pub use development::{
    ae_comparison, expected_at_period, expected_development_fraction, percent_of_ultimate,
    percent_of_year_one, AeComparison, DevelopmentSeries,
};
pub use fanning::{detect_fanning, fanning_signals, FanningSignal};
pub use attribution::{attribute, largest_movements, Attribution};
pub use methods::{method_summaries, MethodSummary};
pub use decision::{DecisionEngine, DecisionInputs, DecisionRow, DecisionRule, Driver};
