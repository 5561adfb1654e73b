//! Flat CSV export of decision tables

use crate::analysis::DecisionRow;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

/// One exported decision row; percentages are already scaled to percent
#[derive(Debug, Serialize)]
struct DecisionCsvRow<'a> {
    #[serde(rename = "Class")]
    class: &'a str,
    #[serde(rename = "Method")]
    method: &'a str,
    #[serde(rename = "Cohort")]
    cohort: &'a str,
    #[serde(rename = "AvsE_Pct")]
    ae_pct: Option<f64>,
    #[serde(rename = "UltimateChange_Pct")]
    ultimate_change_pct: Option<f64>,
    #[serde(rename = "ReserveDeterminism")]
    reserve_det_bucket: &'a str,
    #[serde(rename = "ProjectionQuality")]
    quality_bucket: &'a str,
    #[serde(rename = "FanningBoth")]
    is_fanning_both: bool,
    #[serde(rename = "MethodType")]
    method_type: &'a str,
    #[serde(rename = "Driver")]
    driver: &'a str,
    #[serde(rename = "Suggestion")]
    suggestion: &'a str,
}

/// Streams decision rows for any number of (class, method) tables
pub struct DecisionCsvWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> DecisionCsvWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(inner),
        }
    }

    pub fn write_rows(&mut self, class: &str, method: &str, rows: &[DecisionRow]) -> Result<()> {
        for row in rows {
            self.writer.serialize(DecisionCsvRow {
                class,
                method,
                cohort: &row.cohort,
                ae_pct: row.ae_ratio.map(|r| r * 100.0),
                ultimate_change_pct: row.ultimate_change_pct,
                reserve_det_bucket: row.reserve_det_bucket.map_or("N/A", |b| b.label()),
                quality_bucket: row.quality_bucket.map_or("N/A", |b| b.label()),
                is_fanning_both: row.is_fanning_both,
                method_type: row.method_type.map_or("N/A", |t| t.label()),
                driver: row.driver_label(),
                suggestion: &row.suggestion,
            })?;
        }
        Ok(())
    }

    /// Flush and return the inner writer
    pub fn finish(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| crate::error::DashboardError::Io(e.into_error()))
    }
}

/// Format an optional fraction as a percentage, "N/A" when absent
pub fn format_pct(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{:+.1}%", v * 100.0))
}
