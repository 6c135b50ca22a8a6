pub mod artifacts;
pub mod layout;
pub mod num;
pub mod schema;
pub mod vocab;

pub use artifacts::{DepartmentSummary, KpiSummary, ModelMetrics, WeeklyTrend};
pub use layout::ArtifactLayout;
pub use num::round_dp;
pub use schema::{ColumnDef, ColumnType, DATE_FORMAT, VISIT_SCHEMA, column_def, columns};
pub use vocab::{AdmissionType, DEPARTMENTS, Gender, TREATMENT_CATEGORIES};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kpi_summary_round_trips() {
        let kpis = KpiSummary {
            occupancy_rate: 0.6,
            icu_rate: 0.12,
            avg_length_of_stay: Some(3.25),
            readmission_rate: 0.2,
            mortality_rate: 0.03,
            complication_rate: 0.18,
            avg_treatment_cost: 10452.17,
            opd_share: 0.4,
        };
        let json = serde_json::to_string(&kpis).expect("serialize kpis");
        let round: KpiSummary = serde_json::from_str(&json).expect("deserialize kpis");
        assert_eq!(round.avg_length_of_stay, Some(3.25));
        assert_eq!(round.opd_share, 0.4);
    }

    #[test]
    fn schema_and_vocab_agree_on_admission_types() {
        let def = column_def(columns::ADMISSION_TYPE).expect("admission_type in schema");
        assert_eq!(def.data_type, ColumnType::Str);
        assert_eq!(AdmissionType::Inpatient.as_str(), "Inpatient");
        assert_eq!(AdmissionType::Opd.as_str(), "OPD");
    }
}
