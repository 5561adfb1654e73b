//! Error types for dataset loading and view construction

use thiserror::Error;

/// Errors raised by the analytics core
///
/// Data gaps (missing ultimates, premiums, claim counts) are never errors;
/// they surface as `None` values. These variants cover load failures and
/// invalid view selections.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse dataset JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse records CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("unknown record type `{0}` (expected Actual or Expected)")]
    UnknownRecordType(String),

    #[error("class `{0}` is not present in the dataset")]
    UnknownClass(String),

    #[error("method `{method}` has no estimates for class `{class}`")]
    UnknownMethod { class: String, method: String },

    #[error("quality threshold {0} is outside [0, 1]")]
    InvalidThreshold(f64),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid generator parameter: {0}")]
    Generator(String),
}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, DashboardError>;
