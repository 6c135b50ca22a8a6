pub mod aggregate;
pub mod enrich;
pub mod error;
pub mod kpi;
pub mod week;

use polars::prelude::DataFrame;
use tracing::debug;

use ward_model::{DepartmentSummary, KpiSummary, WeeklyTrend};

pub use aggregate::{department_summary, weekly_trend};
pub use enrich::enrich_visits;
pub use error::{Result, TransformError};
pub use kpi::compute_kpis;
pub use week::week_start;

/// Everything preprocessing produces for one run.
#[derive(Debug, Clone)]
pub struct Preprocessed {
    /// Visit table with the derived feature columns appended.
    pub frame: DataFrame,
    pub kpis: KpiSummary,
    pub departments: Vec<DepartmentSummary>,
    pub weekly: Vec<WeeklyTrend>,
}

/// Runs the full preprocessing stage over a raw visit table.
///
/// Enriches the table, then computes the KPI summary and both grouped
/// aggregates from the enriched result. Pure with respect to its input;
/// calling it again on the enriched output yields the same summaries.
pub fn preprocess(frame: &DataFrame) -> Result<Preprocessed> {
    if frame.height() == 0 {
        return Err(TransformError::EmptyTable);
    }
    let enriched = enrich_visits(frame)?;
    let kpis = compute_kpis(&enriched)?;
    let departments = department_summary(&enriched)?;
    let weekly = weekly_trend(&enriched)?;
    debug!(
        records = enriched.height(),
        departments = departments.len(),
        weeks = weekly.len(),
        "preprocessed visit table"
    );
    Ok(Preprocessed {
        frame: enriched,
        kpis,
        departments,
        weekly,
    })
}
