//! End-to-end: generate a dataset, reload it, and derive every view

use claims_flightpath::analysis::{
    ae_comparison, attribute, expected_at_period, group_by_cohort, passing_methods, ultimate_band,
    Driver,
};
use claims_flightpath::dataset::{
    generate_dataset, load_dataset_from_reader, ClaimRecord, Dataset, GeneratorConfig, MethodType,
    RecordType, UltimateEstimate,
};
use claims_flightpath::{AnalysisConfig, Dashboard, ViewState};

fn dashboard() -> Dashboard {
    let dataset = generate_dataset(&GeneratorConfig::default()).expect("generation failed");
    let json = serde_json::to_string(&dataset).expect("serialize failed");
    let reloaded = load_dataset_from_reader(json.as_bytes()).expect("reload failed");
    assert_eq!(reloaded.records, dataset.records);
    Dashboard::new(reloaded, AnalysisConfig::default())
}

#[test]
fn test_every_class_and_method_renders() {
    let dashboard = dashboard();
    let tables = dashboard.decision_tables(0.5).expect("decision tables failed");

    // 3 classes x 4 methods, one row per cohort with actuals
    assert_eq!(tables.len(), 12);
    for table in &tables {
        assert_eq!(table.rows.len(), 13, "{} / {}", table.class, table.method);
        for row in &table.rows {
            match (row.ae_ratio, row.driver) {
                (Some(r), Some(_)) => assert!(r.abs() > 0.05),
                (_, None) => assert!(row.suggestion.is_empty()),
                (None, Some(d)) => panic!("driver {:?} without an A-vs-E ratio", d),
            }
        }
    }
}

#[test]
fn test_view_consistency() {
    let dashboard = dashboard();
    let view = dashboard
        .view(&ViewState::new("Motor", "Chain Ladder").with_threshold(0.0))
        .expect("view failed");

    assert_eq!(view.series.len(), 13);
    assert_eq!(view.passing_methods.len(), 4);
    assert_eq!(view.bands.len(), 13);
    assert!(view.bands.values().all(|b| b.count == 4 && b.min <= b.max));
    assert_eq!(view.attributions.len(), 13);

    // Fanning-both drives trend acceleration whenever A-vs-E is actionable
    for row in &view.decisions {
        if row.is_fanning_both && row.ae_ratio.is_some_and(|r| r.abs() > 0.05) {
            assert_eq!(row.driver, Some(Driver::TrendAcceleration));
        }
    }
}

#[test]
fn test_threshold_monotonicity_on_generated_data() {
    let dashboard = dashboard();
    let index = dashboard.index();
    let thresholds = [0.0, 0.25, 0.5, 0.75, 1.0];

    for class in ["Motor", "Property", "Liability"] {
        for pair in thresholds.windows(2) {
            let loose = passing_methods(index, class, pair[0]);
            let strict = passing_methods(index, class, pair[1]);
            assert!(strict.is_subset(&loose));

            for cohort in group_by_cohort(&index.dataset().records, class).keys() {
                if let Some(narrow) = ultimate_band(index, class, cohort, &strict) {
                    let wide = ultimate_band(index, class, cohort, &loose).expect("wider band missing");
                    assert!(narrow.min >= wide.min && narrow.max <= wide.max);
                }
            }
        }
    }
}

#[test]
fn test_attribution_conserves_on_generated_claims() {
    let dashboard = dashboard();
    let index = dashboard.index();
    for cohort in group_by_cohort(&index.dataset().records, "Liability").keys() {
        let a = attribute(index, "Liability", cohort);
        assert!((a.large_loss_movement + a.attritional_movement - a.total_movement).abs() < 1e-6);
        assert_eq!(a.large_loss_count + a.attritional_count, a.total_count);
        assert_eq!(a.total_count, 12);
    }
}

#[test]
fn test_reference_scenario_has_no_driver() {
    // Last actual 110 at period 6 against an E2U of 150
    let mut records: Vec<ClaimRecord> = [0.0, 25.0, 45.0, 62.0, 80.0, 96.0, 110.0]
        .iter()
        .enumerate()
        .map(|(dp, value)| ClaimRecord {
            class: "Motor".to_string(),
            cohort: "2022Q1".to_string(),
            development_period: dp as u32,
            record_type: RecordType::Actual,
            value: *value,
        })
        .collect();
    records.push(ClaimRecord {
        class: "Motor".to_string(),
        cohort: "2022Q1".to_string(),
        development_period: 0,
        record_type: RecordType::Expected,
        value: 150.0,
    });
    let dataset = Dataset {
        classes: vec!["Motor".to_string()],
        records,
        ultimates: vec![UltimateEstimate {
            class: "Motor".to_string(),
            cohort: "2022Q1".to_string(),
            method: "Chain Ladder".to_string(),
            value: 140.0,
            method_type: MethodType::ClaimsBased,
        }],
        ..Default::default()
    };

    let grouped = group_by_cohort(&dataset.records, "Motor");
    let ae = ae_comparison(&grouped["2022Q1"], 12).expect("no A-vs-E comparison");
    assert_eq!(ae.development_period, 6);
    assert!((ae.expected - expected_at_period(150.0, 6, 12)).abs() < 1e-9);
    assert!((ae.expected - 112.5).abs() < 1e-9);
    assert!((ae.ratio + 0.0222).abs() < 1e-3);

    let dashboard = Dashboard::new(dataset, AnalysisConfig::default());
    let view = dashboard
        .view(&ViewState::new("Motor", "Chain Ladder"))
        .expect("view failed");
    assert_eq!(view.decisions.len(), 1);
    let row = &view.decisions[0];
    assert_eq!(row.cohort, "2022Q1");
    assert!((row.ae_ratio.expect("missing ratio") - ae.ratio).abs() < 1e-9);
    assert_eq!(row.driver, None);
    assert!(row.suggestion.is_empty());
}
