//! Scalar KPI computation over an enriched visit table.

use polars::prelude::*;

use ward_ingest::{f64_column, i64_column};
use ward_model::{KpiSummary, columns, round_dp};

use crate::error::{Result, TransformError};

fn flag_rate(frame: &DataFrame, name: &str) -> Result<f64> {
    let column = i64_column(frame, name)?;
    column.mean().ok_or_else(|| TransformError::NoData {
        column: name.to_string(),
    })
}

/// Mean length of stay over inpatient records only, `None` when the table
/// has no inpatient records.
fn inpatient_avg_stay(frame: &DataFrame) -> Result<Option<f64>> {
    let stays = i64_column(frame, columns::LENGTH_OF_STAY)?;
    let flags = i64_column(frame, columns::IS_INPATIENT)?;
    let mut sum = 0.0;
    let mut count = 0u64;
    for (stay, flag) in stays.iter().zip(flags.iter()) {
        if flag == Some(1) {
            if let Some(stay) = stay {
                sum += stay as f64;
                count += 1;
            }
        }
    }
    if count == 0 {
        Ok(None)
    } else {
        Ok(Some(round_dp(sum / count as f64, 3)))
    }
}

/// Computes the scalar KPI summary for one pipeline run.
///
/// Every rate is an unweighted mean over all records; rates are rounded to
/// 3 decimals and costs to 2. `opd_share` is derived from the occupancy
/// mean before rounding, so the two shares sum to 1 within rounding error.
pub fn compute_kpis(frame: &DataFrame) -> Result<KpiSummary> {
    let occupancy = flag_rate(frame, columns::IS_INPATIENT)?;
    let costs = f64_column(frame, columns::TREATMENT_COST)?;
    let avg_cost = costs.mean().ok_or_else(|| TransformError::NoData {
        column: columns::TREATMENT_COST.to_string(),
    })?;
    Ok(KpiSummary {
        occupancy_rate: round_dp(occupancy, 3),
        icu_rate: round_dp(flag_rate(frame, columns::ICU_FLAG)?, 3),
        avg_length_of_stay: inpatient_avg_stay(frame)?,
        readmission_rate: round_dp(flag_rate(frame, columns::READMITTED)?, 3),
        mortality_rate: round_dp(flag_rate(frame, columns::MORTALITY_FLAG)?, 3),
        complication_rate: round_dp(flag_rate(frame, columns::COMPLICATION_FLAG)?, 3),
        avg_treatment_cost: round_dp(avg_cost, 2),
        opd_share: round_dp(1.0 - occupancy, 3),
    })
}
