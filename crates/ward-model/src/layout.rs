//! Fixed artifact locations under the pipeline data directory.

use std::path::{Path, PathBuf};

/// Resolves every pipeline artifact path from a single data root.
///
/// The layout is fixed: raw input lives at `raw/patient_events.csv`, every
/// produced artifact under `processed/`. Each run fully overwrites whatever
/// a previous run left behind.
#[derive(Debug, Clone)]
pub struct ArtifactLayout {
    root: PathBuf,
}

impl ArtifactLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Raw patient events, generated when absent.
    pub fn raw_events(&self) -> PathBuf {
        self.root.join("raw").join("patient_events.csv")
    }

    pub fn processed_dir(&self) -> PathBuf {
        self.root.join("processed")
    }

    /// Enriched visit records.
    pub fn processed_patients(&self) -> PathBuf {
        self.processed_dir().join("processed_patients.csv")
    }

    pub fn department_summary(&self) -> PathBuf {
        self.processed_dir().join("department_summary.csv")
    }

    pub fn weekly_trend(&self) -> PathBuf {
        self.processed_dir().join("weekly_trend.csv")
    }

    pub fn kpi_summary(&self) -> PathBuf {
        self.processed_dir().join("kpi_summary.json")
    }

    /// Scored records with predicted probability and class.
    pub fn predictions(&self) -> PathBuf {
        self.processed_dir().join("predictions.csv")
    }

    pub fn model_metrics(&self) -> PathBuf {
        self.processed_dir().join("model_metrics.json")
    }

    /// Serialized readmission classifier.
    pub fn readmission_model(&self) -> PathBuf {
        self.processed_dir().join("models").join("readmission_model.json")
    }
}
