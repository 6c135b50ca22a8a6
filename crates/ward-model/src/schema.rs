//! Visit-table schema definitions.
//!
//! The raw patient-events table has a fixed column set; every pipeline stage
//! addresses columns through the names defined here rather than string
//! literals scattered across crates.

use std::fmt;

/// Storage type of a visit-table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// 64-bit integer: identifiers, counts, and 0/1 flags.
    Int,
    /// 64-bit float: costs and scores.
    Float,
    /// Calendar date in ISO `%Y-%m-%d` form, carried as a string column.
    Date,
    /// Free text or controlled vocabulary.
    Str,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Int => "Int",
            ColumnType::Float => "Float",
            ColumnType::Date => "Date",
            ColumnType::Str => "Str",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One column of the raw visit table.
#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    pub name: &'static str,
    pub data_type: ColumnType,
}

/// Column names used across the pipeline.
///
/// The first block is the raw table in on-disk order; the second block is
/// appended by preprocessing and scoring.
pub mod columns {
    pub const PATIENT_ID: &str = "patient_id";
    pub const ADMISSION_TYPE: &str = "admission_type";
    pub const DEPARTMENT: &str = "department";
    pub const TREATMENT_CATEGORY: &str = "treatment_category";
    pub const AGE: &str = "age";
    pub const GENDER: &str = "gender";
    pub const ADMISSION_DATE: &str = "admission_date";
    pub const DISCHARGE_DATE: &str = "discharge_date";
    pub const LENGTH_OF_STAY: &str = "length_of_stay";
    pub const ICU_FLAG: &str = "icu_flag";
    pub const COMPLICATION_FLAG: &str = "complication_flag";
    pub const MORTALITY_FLAG: &str = "mortality_flag";
    pub const READMITTED: &str = "readmitted";
    pub const TREATMENT_COST: &str = "treatment_cost";
    pub const LAB_SCORE: &str = "lab_score";
    pub const VITAL_RISK_SCORE: &str = "vital_risk_score";
    pub const RISK_SCORE: &str = "risk_score";
    pub const NOTE_TEXT: &str = "note_text";
    pub const OPD_VISIT: &str = "opd_visit";

    // Added by preprocessing.
    pub const ADMISSION_WEEK: &str = "admission_week";
    pub const DISCHARGE_WEEK: &str = "discharge_week";
    pub const IS_INPATIENT: &str = "is_inpatient";
    pub const COST_PER_DAY: &str = "cost_per_day";

    // Added by model scoring.
    pub const PREDICTED_READMISSION_PROB: &str = "predicted_readmission_prob";
    pub const PREDICTED_READMISSION_CLASS: &str = "predicted_readmission_class";
}

/// The raw visit table, in on-disk column order.
pub const VISIT_SCHEMA: &[ColumnDef] = &[
    ColumnDef { name: columns::PATIENT_ID, data_type: ColumnType::Int },
    ColumnDef { name: columns::ADMISSION_TYPE, data_type: ColumnType::Str },
    ColumnDef { name: columns::DEPARTMENT, data_type: ColumnType::Str },
    ColumnDef { name: columns::TREATMENT_CATEGORY, data_type: ColumnType::Str },
    ColumnDef { name: columns::AGE, data_type: ColumnType::Int },
    ColumnDef { name: columns::GENDER, data_type: ColumnType::Str },
    ColumnDef { name: columns::ADMISSION_DATE, data_type: ColumnType::Date },
    ColumnDef { name: columns::DISCHARGE_DATE, data_type: ColumnType::Date },
    ColumnDef { name: columns::LENGTH_OF_STAY, data_type: ColumnType::Int },
    ColumnDef { name: columns::ICU_FLAG, data_type: ColumnType::Int },
    ColumnDef { name: columns::COMPLICATION_FLAG, data_type: ColumnType::Int },
    ColumnDef { name: columns::MORTALITY_FLAG, data_type: ColumnType::Int },
    ColumnDef { name: columns::READMITTED, data_type: ColumnType::Int },
    ColumnDef { name: columns::TREATMENT_COST, data_type: ColumnType::Float },
    ColumnDef { name: columns::LAB_SCORE, data_type: ColumnType::Float },
    ColumnDef { name: columns::VITAL_RISK_SCORE, data_type: ColumnType::Float },
    ColumnDef { name: columns::RISK_SCORE, data_type: ColumnType::Float },
    ColumnDef { name: columns::NOTE_TEXT, data_type: ColumnType::Str },
    ColumnDef { name: columns::OPD_VISIT, data_type: ColumnType::Int },
];

/// Date format for every calendar-date value the pipeline reads or writes.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Look up a raw-table column definition by name.
pub fn column_def(name: &str) -> Option<&'static ColumnDef> {
    VISIT_SCHEMA.iter().find(|def| def.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_has_unique_names() {
        let mut seen = std::collections::BTreeSet::new();
        for def in VISIT_SCHEMA {
            assert!(seen.insert(def.name), "duplicate column {}", def.name);
        }
        assert_eq!(VISIT_SCHEMA.len(), 19);
    }

    #[test]
    fn date_columns_carry_the_date_type() {
        for name in [columns::ADMISSION_DATE, columns::DISCHARGE_DATE] {
            let def = column_def(name).expect("date column in schema");
            assert_eq!(def.data_type, ColumnType::Date);
        }
    }

    #[test]
    fn lookup_misses_derived_columns() {
        assert!(column_def(columns::PATIENT_ID).is_some());
        assert!(column_def(columns::COST_PER_DAY).is_none());
    }
}
