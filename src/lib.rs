//! Claims Flight Path - actual vs expected to ultimate analytics
//!
//! This library provides:
//! - Grouping of long-format claim records into per-cohort development series
//! - Current/prior ultimate lookups and a quality-filtered ultimate band
//! - Percent-of-ultimate and percent-of-year-1 normalizations
//! - Fanning detection, large-loss attribution and reserving decision rules
//! - Dataset loading (JSON/CSV) and deterministic synthetic generation

pub mod error;
pub mod config;
pub mod dataset;
pub mod analysis;
pub mod dashboard;
pub mod report;

// Re-export commonly used types
pub use error::{DashboardError, Result};
pub use config::{AnalysisConfig, DecisionThresholds, ViewState};
pub use dataset::{Dataset, DatasetIndex, load_dataset};
pub use analysis::{DecisionRow, Driver};
pub use dashboard::{Dashboard, DashboardView};
