//! Typed rows for the persisted pipeline artifacts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Scalar KPIs computed once per run over the full record set.
///
/// Field order is the key order of the persisted JSON. Rates are unweighted
/// means rounded to 3 decimals; cost means are rounded to 2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    /// Inpatient share of all visits.
    pub occupancy_rate: f64,
    pub icu_rate: f64,
    /// Mean stay length over inpatient rows only. `None` when the dataset
    /// contains no inpatient rows, serialized as JSON `null`.
    pub avg_length_of_stay: Option<f64>,
    pub readmission_rate: f64,
    pub mortality_rate: f64,
    pub complication_rate: f64,
    pub avg_treatment_cost: f64,
    /// Always `1 - occupancy_rate` up to rounding.
    pub opd_share: f64,
}

/// One aggregate row per distinct department in the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentSummary {
    pub department: String,
    pub admissions: u64,
    pub avg_length_of_stay: f64,
    pub readmission_rate: f64,
    pub avg_treatment_cost: f64,
    pub icu_rate: f64,
}

/// One aggregate row per ISO admission week, ascending by week start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyTrend {
    /// Monday of the admission week.
    pub admission_week: NaiveDate,
    pub admissions: u64,
    pub avg_treatment_cost: f64,
}

/// Held-out evaluation metrics for one training run. Immutable once computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub roc_auc: f64,
    pub test_accuracy: f64,
}
