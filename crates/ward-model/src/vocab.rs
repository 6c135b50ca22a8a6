//! Controlled vocabularies for the visit table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether a visit is an admission or an outpatient (OPD) encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdmissionType {
    Inpatient,
    Opd,
}

impl AdmissionType {
    /// Canonical value as stored in the table.
    pub fn as_str(&self) -> &'static str {
        match self {
            AdmissionType::Inpatient => "Inpatient",
            AdmissionType::Opd => "OPD",
        }
    }

    pub fn is_inpatient(&self) -> bool {
        matches!(self, AdmissionType::Inpatient)
    }
}

impl fmt::Display for AdmissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdmissionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "INPATIENT" => Ok(AdmissionType::Inpatient),
            "OPD" | "OUTPATIENT" => Ok(AdmissionType::Opd),
            _ => Err(format!("Unknown admission type: {s}")),
        }
    }
}

/// Recorded patient gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "MALE" | "M" => Ok(Gender::Male),
            "FEMALE" | "F" => Ok(Gender::Female),
            "OTHER" => Ok(Gender::Other),
            _ => Err(format!("Unknown gender: {s}")),
        }
    }
}

/// Hospital departments the generator draws from. Aggregation works off the
/// values present in the data, so an external file may carry others.
pub const DEPARTMENTS: &[&str] = &[
    "Cardiology",
    "Oncology",
    "Orthopedics",
    "Neurology",
    "Emergency",
    "Gastroenterology",
    "Pulmonology",
];

/// Treatment categories the generator draws from.
pub const TREATMENT_CATEGORIES: &[&str] = &[
    "Surgery",
    "Medication",
    "Therapy",
    "Observation",
    "Diagnostics",
];
