//! End-to-end preprocessing checks over generated visit tables.

use std::collections::BTreeSet;

use ward_ingest::str_column;
use ward_model::columns;
use ward_synth::{SynthOptions, generate_visits};
use ward_transform::{Preprocessed, TransformError, preprocess};

fn generated(records: usize) -> polars::prelude::DataFrame {
    let options = SynthOptions {
        records,
        seed: 42,
        ..SynthOptions::default()
    };
    generate_visits(&options).expect("generate visits")
}

#[test]
fn kpi_summary_covers_every_metric_in_range() {
    let raw = generated(100);
    let Preprocessed { kpis, .. } = preprocess(&raw).expect("preprocess");

    for rate in [
        kpis.occupancy_rate,
        kpis.icu_rate,
        kpis.readmission_rate,
        kpis.mortality_rate,
        kpis.complication_rate,
        kpis.opd_share,
    ] {
        assert!((0.0..=1.0).contains(&rate), "rate out of range: {rate}");
    }
    assert!(kpis.avg_treatment_cost > 0.0);
    let avg_stay = kpis.avg_length_of_stay.expect("inpatients present");
    assert!(avg_stay >= 1.0);
    assert!((kpis.occupancy_rate + kpis.opd_share - 1.0).abs() < 2e-3);
}

#[test]
fn department_rows_match_distinct_departments_and_total_count() {
    let raw = generated(120);
    let result = preprocess(&raw).expect("preprocess");

    let departments = str_column(&result.frame, columns::DEPARTMENT).expect("department column");
    let distinct: BTreeSet<String> = departments
        .iter()
        .flatten()
        .map(|value| value.to_string())
        .collect();
    assert_eq!(result.departments.len(), distinct.len());

    let total: u64 = result.departments.iter().map(|row| row.admissions).sum();
    assert_eq!(total, 120);
}

#[test]
fn weekly_trend_ascends_and_covers_every_record() {
    let raw = generated(90);
    let result = preprocess(&raw).expect("preprocess");

    let weeks: Vec<_> = result.weekly.iter().map(|row| row.admission_week).collect();
    let mut sorted = weeks.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(weeks, sorted);

    let total: u64 = result.weekly.iter().map(|row| row.admissions).sum();
    assert_eq!(total, 90);
}

#[test]
fn preprocess_is_idempotent_on_its_own_output() {
    let raw = generated(80);
    let first = preprocess(&raw).expect("first pass");
    let second = preprocess(&first.frame).expect("second pass");

    assert_eq!(first.kpis, second.kpis);
    assert_eq!(first.departments, second.departments);
    assert_eq!(first.weekly, second.weekly);
    assert!(first.frame.equals_missing(&second.frame));
}

#[test]
fn empty_table_is_rejected() {
    let raw = generated(5);
    let empty = raw.head(Some(0));
    let err = preprocess(&empty).expect_err("empty table");
    assert!(matches!(err, TransformError::EmptyTable));
}
