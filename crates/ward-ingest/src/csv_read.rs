//! CSV loading for visit tables.

use std::path::Path;

use chrono::NaiveDate;
use csv::ReaderBuilder;
use polars::prelude::*;
use tracing::debug;

use ward_model::{ColumnType, DATE_FORMAT, VISIT_SCHEMA, column_def};

use crate::error::{IngestError, Result};
use crate::frame_utils::{parse_f64, parse_i64};

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

fn read_raw(path: &Path) -> Result<RawTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .iter()
        .map(normalize_cell)
        .collect();
    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        let mut row = Vec::with_capacity(headers.len());
        for idx in 0..headers.len() {
            row.push(normalize_cell(record.get(idx).unwrap_or("")));
        }
        rows.push(row);
    }
    Ok(RawTable { headers, rows })
}

fn cell<'a>(row: &'a [String], idx: usize) -> &'a str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

fn int_column(name: &str, idx: usize, rows: &[Vec<String>]) -> Result<Column> {
    let mut values: Vec<Option<i64>> = Vec::with_capacity(rows.len());
    for (row_idx, row) in rows.iter().enumerate() {
        let raw = cell(row, idx);
        if raw.is_empty() {
            values.push(None);
            continue;
        }
        match parse_i64(raw) {
            Some(v) => values.push(Some(v)),
            None => {
                return Err(IngestError::InvalidNumber {
                    column: name.to_string(),
                    row: row_idx + 1,
                    value: raw.to_string(),
                });
            }
        }
    }
    Ok(Series::new(name.into(), values).into())
}

fn float_column(name: &str, idx: usize, rows: &[Vec<String>]) -> Result<Column> {
    let mut values: Vec<Option<f64>> = Vec::with_capacity(rows.len());
    for (row_idx, row) in rows.iter().enumerate() {
        let raw = cell(row, idx);
        if raw.is_empty() {
            values.push(None);
            continue;
        }
        match parse_f64(raw) {
            Some(v) => values.push(Some(v)),
            None => {
                return Err(IngestError::InvalidNumber {
                    column: name.to_string(),
                    row: row_idx + 1,
                    value: raw.to_string(),
                });
            }
        }
    }
    Ok(Series::new(name.into(), values).into())
}

fn date_column(name: &str, idx: usize, rows: &[Vec<String>]) -> Result<Column> {
    let mut values: Vec<Option<String>> = Vec::with_capacity(rows.len());
    for (row_idx, row) in rows.iter().enumerate() {
        let raw = cell(row, idx);
        if raw.is_empty() {
            values.push(None);
            continue;
        }
        let parsed =
            NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| IngestError::InvalidDate {
                column: name.to_string(),
                row: row_idx + 1,
                value: raw.to_string(),
            })?;
        values.push(Some(parsed.format(DATE_FORMAT).to_string()));
    }
    Ok(Series::new(name.into(), values).into())
}

fn str_column(name: &str, idx: usize, rows: &[Vec<String>]) -> Column {
    let values: Vec<String> = rows.iter().map(|row| cell(row, idx).to_string()).collect();
    Series::new(name.into(), values).into()
}

/// Loads a visit table from `path`, typing each column per the visit schema.
///
/// Date columns are validated against `%Y-%m-%d` and kept as normalized
/// strings. Columns outside the schema are carried along untyped. Every
/// schema column must be present.
pub fn load_visits(path: &Path) -> Result<DataFrame> {
    let table = read_raw(path)?;
    for def in VISIT_SCHEMA {
        if !table.headers.iter().any(|header| header == def.name) {
            return Err(IngestError::MissingColumn {
                name: def.name.to_string(),
            });
        }
    }
    let mut columns: Vec<Column> = Vec::with_capacity(table.headers.len());
    for (idx, header) in table.headers.iter().enumerate() {
        let column = match column_def(header).map(|def| def.data_type) {
            Some(ColumnType::Int) => int_column(header, idx, &table.rows)?,
            Some(ColumnType::Float) => float_column(header, idx, &table.rows)?,
            Some(ColumnType::Date) => date_column(header, idx, &table.rows)?,
            Some(ColumnType::Str) | None => str_column(header, idx, &table.rows),
        };
        columns.push(column);
    }
    let frame = DataFrame::new(columns)?;
    debug!(
        path = %path.display(),
        rows = frame.height(),
        "loaded visit table"
    );
    Ok(frame)
}

/// Loads any CSV as an all-string frame, without schema typing.
///
/// Used for artifact tables whose columns vary by producer.
pub fn read_table(path: &Path) -> Result<DataFrame> {
    let table = read_raw(path)?;
    let columns: Vec<Column> = table
        .headers
        .iter()
        .enumerate()
        .map(|(idx, header)| str_column(header, idx, &table.rows))
        .collect();
    let frame = DataFrame::new(columns)?;
    debug!(
        path = %path.display(),
        rows = frame.height(),
        "loaded table"
    );
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::frame_utils::{f64_column, i64_column, str_column as typed_str_column};
    use ward_model::columns;

    const SAMPLE: &str = "\
patient_id,admission_type,department,treatment_category,age,gender,admission_date,discharge_date,length_of_stay,icu_flag,complication_flag,mortality_flag,readmitted,treatment_cost,lab_score,vital_risk_score,risk_score,note_text,opd_visit
1,Inpatient,Cardiology,Surgery,64,Male,2025-01-05,2025-01-09,4,1,0,0,1,12840.5,0.61,0.44,0.52,\"Patient admitted to Cardiology with moderate acuity. Clinical team monitoring vitals, labs, and response to therapy.\",0
2,OPD,Oncology,Medication,37,Female,2025-02-10,2025-02-11,1,0,0,0,0,6120.0,0.47,0.3,0.38,\"Patient admitted to Oncology with moderate acuity. Clinical team monitoring vitals, labs, and response to therapy.\",1
";

    fn write_sample(dir: &tempfile::TempDir, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join("patient_events.csv");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_typed_visit_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sample(&dir, SAMPLE);
        let frame = load_visits(&path).unwrap();
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.width(), 19);

        let ages = i64_column(&frame, columns::AGE).unwrap();
        assert_eq!(ages.get(0), Some(64));
        let labs = f64_column(&frame, columns::LAB_SCORE).unwrap();
        assert_eq!(labs.get(1), Some(0.47));
        let dates = typed_str_column(&frame, columns::ADMISSION_DATE).unwrap();
        assert_eq!(dates.get(0), Some("2025-01-05"));
        let notes = typed_str_column(&frame, columns::NOTE_TEXT).unwrap();
        assert!(notes.get(0).unwrap().starts_with("Patient admitted to Cardiology"));
    }

    #[test]
    fn normalizes_unpadded_dates() {
        let dir = tempfile::tempdir().unwrap();
        let contents = SAMPLE.replace("2025-01-05", "2025-1-5");
        let path = write_sample(&dir, &contents);
        let frame = load_visits(&path).unwrap();
        let dates = typed_str_column(&frame, columns::ADMISSION_DATE).unwrap();
        assert_eq!(dates.get(0), Some("2025-01-05"));
    }

    #[test]
    fn rejects_malformed_dates() {
        let dir = tempfile::tempdir().unwrap();
        let contents = SAMPLE.replace("2025-02-10", "not-a-date");
        let path = write_sample(&dir, &contents);
        let err = load_visits(&path).unwrap_err();
        match err {
            IngestError::InvalidDate { column, row, value } => {
                assert_eq!(column, columns::ADMISSION_DATE);
                assert_eq!(row, 2);
                assert_eq!(value, "not-a-date");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_missing_schema_column() {
        let dir = tempfile::tempdir().unwrap();
        let contents = SAMPLE.replace(",risk_score,", ",composite,");
        let path = write_sample(&dir, &contents);
        let err = load_visits(&path).unwrap_err();
        assert!(matches!(
            err,
            IngestError::MissingColumn { ref name } if name == columns::RISK_SCORE
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_visits(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, IngestError::Csv { .. }));
    }

    #[test]
    fn read_table_keeps_everything_as_strings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weekly_trend.csv");
        fs::write(&path, "admission_week,admissions,avg_treatment_cost\n2025-01-06,12,8431.2\n").unwrap();
        let frame = read_table(&path).unwrap();
        assert_eq!(frame.height(), 1);
        let counts = typed_str_column(&frame, "admissions").unwrap();
        assert_eq!(counts.get(0), Some("12"));
    }
}
