//! Readers for persisted artifacts.
//!
//! Every reader returns `Ok(None)` when the artifact file does not exist,
//! so display layers can show a warning instead of failing the whole view.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use ward_model::{KpiSummary, ModelMetrics};

/// Reads and parses a JSON artifact, `None` if the file is absent.
pub fn read_json_opt<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents =
        fs::read_to_string(path).with_context(|| format!("read json: {}", path.display()))?;
    let value = serde_json::from_str(&contents)
        .with_context(|| format!("parse json: {}", path.display()))?;
    Ok(Some(value))
}

/// Reads the persisted KPI summary if present.
pub fn read_kpi_summary(path: &Path) -> Result<Option<KpiSummary>> {
    read_json_opt(path)
}

/// Reads the persisted model metrics if present.
pub fn read_model_metrics(path: &Path) -> Result<Option<ModelMetrics>> {
    read_json_opt(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writers::write_json_pretty;

    #[test]
    fn absent_artifact_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let missing = read_kpi_summary(&dir.path().join("kpi_summary.json")).unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn metrics_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model_metrics.json");
        let metrics = ModelMetrics {
            roc_auc: 0.842,
            test_accuracy: 0.791,
        };
        write_json_pretty(&path, &metrics).unwrap();
        let reread = read_model_metrics(&path).unwrap().unwrap();
        assert_eq!(reread, metrics);
    }

    #[test]
    fn malformed_artifact_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model_metrics.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(read_model_metrics(&path).is_err());
    }
}
