//! Per-record feature derivation on a loaded visit table.

use chrono::NaiveDate;
use polars::prelude::*;

use ward_ingest::{f64_column, i64_column, str_column};
use ward_model::vocab::AdmissionType;
use ward_model::{DATE_FORMAT, columns, round_dp};

use crate::error::{Result, TransformError};
use crate::week::week_start;

const DERIVED_COLUMNS: [&str; 4] = [
    columns::ADMISSION_WEEK,
    columns::DISCHARGE_WEEK,
    columns::IS_INPATIENT,
    columns::COST_PER_DAY,
];

fn week_starts(source: &str, dates: &StringChunked) -> Result<Vec<Option<String>>> {
    dates
        .iter()
        .map(|value| match value {
            Some(raw) => {
                let date = NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| {
                    TransformError::InvalidDate {
                        column: source.to_string(),
                        value: raw.to_string(),
                    }
                })?;
                Ok(Some(week_start(date).format(DATE_FORMAT).to_string()))
            }
            None => Ok(None),
        })
        .collect()
}

/// Adds the derived feature columns to a visit table.
///
/// Appends `admission_week`, `discharge_week`, `is_inpatient`, and
/// `cost_per_day`. Existing derived columns are replaced, so enriching an
/// already-enriched table yields the same result.
pub fn enrich_visits(frame: &DataFrame) -> Result<DataFrame> {
    let admission_dates = str_column(frame, columns::ADMISSION_DATE)?;
    let discharge_dates = str_column(frame, columns::DISCHARGE_DATE)?;
    let admission_types = str_column(frame, columns::ADMISSION_TYPE)?;
    let costs = f64_column(frame, columns::TREATMENT_COST)?;
    let stays = i64_column(frame, columns::LENGTH_OF_STAY)?;

    let admission_weeks = week_starts(columns::ADMISSION_DATE, admission_dates)?;
    let discharge_weeks = week_starts(columns::DISCHARGE_DATE, discharge_dates)?;

    let inpatient_flags: Vec<i64> = admission_types
        .iter()
        .map(|value| i64::from(value == Some(AdmissionType::Inpatient.as_str())))
        .collect();

    let cost_per_day: Vec<Option<f64>> = costs
        .iter()
        .zip(stays.iter())
        .map(|pair| match pair {
            (Some(cost), Some(stay)) => Some(round_dp(cost / stay as f64, 2)),
            _ => None,
        })
        .collect();

    let mut out: Vec<Column> = frame
        .get_columns()
        .iter()
        .filter(|column| !DERIVED_COLUMNS.contains(&column.name().as_str()))
        .cloned()
        .collect();
    out.push(Series::new(columns::ADMISSION_WEEK.into(), admission_weeks).into());
    out.push(Series::new(columns::DISCHARGE_WEEK.into(), discharge_weeks).into());
    out.push(Series::new(columns::IS_INPATIENT.into(), inpatient_flags).into());
    out.push(Series::new(columns::COST_PER_DAY.into(), cost_per_day).into());
    Ok(DataFrame::new(out)?)
}
