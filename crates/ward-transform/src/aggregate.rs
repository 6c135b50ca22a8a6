//! Department and weekly group-by aggregates.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use polars::prelude::*;

use ward_ingest::{f64_column, i64_column, str_column};
use ward_model::{DATE_FORMAT, DepartmentSummary, WeeklyTrend, columns, round_dp};

use crate::error::{Result, TransformError};

#[derive(Debug, Default)]
struct DeptAcc {
    admissions: u64,
    stay_sum: f64,
    stay_count: u64,
    readmit_sum: f64,
    readmit_count: u64,
    cost_sum: f64,
    cost_count: u64,
    icu_sum: f64,
    icu_count: u64,
}

fn mean(sum: f64, count: u64) -> f64 {
    sum / count as f64
}

/// Aggregates one summary row per distinct department, in department order.
pub fn department_summary(frame: &DataFrame) -> Result<Vec<DepartmentSummary>> {
    let departments = str_column(frame, columns::DEPARTMENT)?;
    let stays = i64_column(frame, columns::LENGTH_OF_STAY)?;
    let readmitted = i64_column(frame, columns::READMITTED)?;
    let costs = f64_column(frame, columns::TREATMENT_COST)?;
    let icu_flags = i64_column(frame, columns::ICU_FLAG)?;

    let mut groups: BTreeMap<String, DeptAcc> = BTreeMap::new();
    for idx in 0..frame.height() {
        let department = departments.get(idx).unwrap_or("").to_string();
        let acc = groups.entry(department).or_default();
        acc.admissions += 1;
        if let Some(stay) = stays.get(idx) {
            acc.stay_sum += stay as f64;
            acc.stay_count += 1;
        }
        if let Some(flag) = readmitted.get(idx) {
            acc.readmit_sum += flag as f64;
            acc.readmit_count += 1;
        }
        if let Some(cost) = costs.get(idx) {
            acc.cost_sum += cost;
            acc.cost_count += 1;
        }
        if let Some(flag) = icu_flags.get(idx) {
            acc.icu_sum += flag as f64;
            acc.icu_count += 1;
        }
    }

    Ok(groups
        .into_iter()
        .map(|(department, acc)| DepartmentSummary {
            department,
            admissions: acc.admissions,
            avg_length_of_stay: round_dp(mean(acc.stay_sum, acc.stay_count), 3),
            readmission_rate: round_dp(mean(acc.readmit_sum, acc.readmit_count), 3),
            avg_treatment_cost: round_dp(mean(acc.cost_sum, acc.cost_count), 3),
            icu_rate: round_dp(mean(acc.icu_sum, acc.icu_count), 3),
        })
        .collect())
}

#[derive(Debug, Default)]
struct WeekAcc {
    admissions: u64,
    cost_sum: f64,
    cost_count: u64,
}

/// Aggregates one trend row per admission week, ascending by week start.
///
/// Rows without an admission week are left out of the trend.
pub fn weekly_trend(frame: &DataFrame) -> Result<Vec<WeeklyTrend>> {
    let weeks = str_column(frame, columns::ADMISSION_WEEK)?;
    let costs = f64_column(frame, columns::TREATMENT_COST)?;

    let mut groups: BTreeMap<NaiveDate, WeekAcc> = BTreeMap::new();
    for idx in 0..frame.height() {
        let Some(raw) = weeks.get(idx) else {
            continue;
        };
        let week = NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| {
            TransformError::InvalidDate {
                column: columns::ADMISSION_WEEK.to_string(),
                value: raw.to_string(),
            }
        })?;
        let acc = groups.entry(week).or_default();
        acc.admissions += 1;
        if let Some(cost) = costs.get(idx) {
            acc.cost_sum += cost;
            acc.cost_count += 1;
        }
    }

    Ok(groups
        .into_iter()
        .map(|(admission_week, acc)| WeeklyTrend {
            admission_week,
            admissions: acc.admissions,
            avg_treatment_cost: mean(acc.cost_sum, acc.cost_count),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aggregate_frame() -> DataFrame {
        DataFrame::new(vec![
            Series::new(
                columns::DEPARTMENT.into(),
                vec!["Oncology", "Cardiology", "Oncology", "Cardiology"],
            )
            .into(),
            Series::new(
                columns::ADMISSION_WEEK.into(),
                vec!["2025-01-13", "2025-01-06", "2025-01-06", "2025-01-06"],
            )
            .into(),
            Series::new(columns::LENGTH_OF_STAY.into(), vec![2i64, 4, 6, 2]).into(),
            Series::new(columns::READMITTED.into(), vec![1i64, 0, 0, 0]).into(),
            Series::new(
                columns::TREATMENT_COST.into(),
                vec![1000.0, 3000.0, 2000.0, 1000.0],
            )
            .into(),
            Series::new(columns::ICU_FLAG.into(), vec![0i64, 1, 1, 0]).into(),
        ])
        .unwrap()
    }

    #[test]
    fn department_rows_are_sorted_and_rounded() {
        let rows = department_summary(&aggregate_frame()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].department, "Cardiology");
        assert_eq!(rows[0].admissions, 2);
        assert_eq!(rows[0].avg_length_of_stay, 3.0);
        assert_eq!(rows[0].avg_treatment_cost, 2000.0);
        assert_eq!(rows[0].icu_rate, 0.5);
        assert_eq!(rows[1].department, "Oncology");
        assert_eq!(rows[1].readmission_rate, 0.5);
    }

    #[test]
    fn weekly_rows_ascend_and_cover_all_dated_records() {
        let rows = weekly_trend(&aggregate_frame()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].admission_week,
            NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
        );
        assert_eq!(rows[0].admissions, 3);
        assert_eq!(rows[0].avg_treatment_cost, 2000.0);
        assert_eq!(rows[1].admissions, 1);
        let total: u64 = rows.iter().map(|row| row.admissions).sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn rows_without_week_are_skipped() {
        let frame = DataFrame::new(vec![
            Series::new(
                columns::ADMISSION_WEEK.into(),
                vec![Some("2025-01-06"), None],
            )
            .into(),
            Series::new(columns::TREATMENT_COST.into(), vec![1000.0, 2000.0]).into(),
        ])
        .unwrap();
        let rows = weekly_trend(&frame).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].admissions, 1);
    }
}
