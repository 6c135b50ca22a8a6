use std::path::PathBuf;

use ward_model::{KpiSummary, ModelMetrics};

#[derive(Debug)]
pub struct RunResult {
    pub data_dir: PathBuf,
    pub generated: bool,
    pub fingerprint: String,
    pub records: usize,
    pub kpis: KpiSummary,
    pub metrics: Option<ModelMetrics>,
    pub artifacts: Vec<ArtifactEntry>,
}

#[derive(Debug)]
pub struct ArtifactEntry {
    pub label: &'static str,
    pub path: PathBuf,
    pub rows: Option<usize>,
}
