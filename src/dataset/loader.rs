//! Load the dashboard dataset from JSON, or long-format records from CSV

use super::{ClaimRecord, Dataset, RecordType};
use crate::error::{DashboardError, Result};
use csv::Reader;
use log::info;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Default location of the generated dashboard payload
pub const DEFAULT_DATASET_PATH: &str = "data/analytics.json";

/// Raw CSV row matching the long-format export columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Class")]
    class: String,
    #[serde(rename = "Cohort")]
    cohort: String,
    #[serde(rename = "Development_Period")]
    development_period: u32,
    #[serde(rename = "Type")]
    record_type: String,
    #[serde(rename = "Value")]
    value: f64,
}

impl CsvRow {
    fn into_record(self) -> Result<ClaimRecord> {
        let record_type = RecordType::parse(&self.record_type)
            .ok_or(DashboardError::UnknownRecordType(self.record_type))?;

        Ok(ClaimRecord {
            class: self.class,
            cohort: self.cohort,
            development_period: self.development_period,
            record_type,
            value: self.value,
        })
    }
}

/// Load the full dataset from a JSON file
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let file = File::open(path.as_ref())?;
    let dataset = load_dataset_from_reader(BufReader::new(file))?;
    info!(
        "Loaded {} records, {} ultimates, {} claims from {}",
        dataset.records.len(),
        dataset.ultimates.len(),
        dataset.claims.len(),
        path.as_ref().display()
    );
    Ok(dataset)
}

/// Load the full dataset from any reader (e.g., string buffer, network stream)
pub fn load_dataset_from_reader<R: std::io::Read>(reader: R) -> Result<Dataset> {
    let mut dataset: Dataset = serde_json::from_reader(reader)?;
    fill_classes(&mut dataset);
    Ok(dataset)
}

/// Load long-format claim records from a CSV file
pub fn load_records_csv<P: AsRef<Path>>(path: P) -> Result<Vec<ClaimRecord>> {
    let reader = Reader::from_path(path)?;
    collect_records(reader)
}

/// Load long-format claim records from any reader
pub fn load_records_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<ClaimRecord>> {
    collect_records(Reader::from_reader(reader))
}

fn collect_records<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<ClaimRecord>> {
    let mut records = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        records.push(row.into_record()?);
    }

    Ok(records)
}

/// Payloads produced by older exports omit `classes`; derive it from records
fn fill_classes(dataset: &mut Dataset) {
    if !dataset.classes.is_empty() {
        return;
    }
    let mut classes: Vec<String> = dataset.records.iter().map(|r| r.class.clone()).collect();
    classes.sort();
    classes.dedup();
    dataset.classes = classes;
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "Class,Cohort,Development_Period,Type,Value
Motor,2022Q1,0,Actual,0
Motor,2022Q1,1,Actual,125000.5
Motor,2022Q1,0,Expected,1200000
";

    #[test]
    fn test_load_records_from_csv() {
        let records = load_records_from_reader(CSV.as_bytes()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].value, 125000.5);
        assert_eq!(records[2].record_type, RecordType::Expected);
    }

    #[test]
    fn test_csv_unknown_type_is_error() {
        let csv = "Class,Cohort,Development_Period,Type,Value\nMotor,2022Q1,0,Paid,1\n";
        match load_records_from_reader(csv.as_bytes()) {
            Err(DashboardError::UnknownRecordType(t)) => assert_eq!(t, "Paid"),
            other => panic!("expected UnknownRecordType, got {:?}", other),
        }
    }

    #[test]
    fn test_json_classes_derived_from_records() {
        let json = r#"{
            "records": [
                {"Class":"Property","Cohort":"2022Q1","Development_Period":0,"Type":"Actual","Value":0},
                {"Class":"Motor","Cohort":"2022Q1","Development_Period":0,"Type":"Actual","Value":0},
                {"Class":"Motor","Cohort":"2022Q2","Development_Period":0,"Type":"Actual","Value":0}
            ]
        }"#;
        let dataset = load_dataset_from_reader(json.as_bytes()).unwrap();
        assert_eq!(dataset.classes, vec!["Motor".to_string(), "Property".to_string()]);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(matches!(
            load_dataset_from_reader("{ not json".as_bytes()),
            Err(DashboardError::Json(_))
        ));
    }
}
