//! Visit analytics pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Acquire**: Load the raw patient-events table, generating it first
//!    when absent
//! 2. **Preprocess**: Derive features, compute KPIs and grouped aggregates,
//!    persist the processed artifacts
//! 3. **Train**: Fit the readmission classifier, persist predictions,
//!    metrics, and the model
//!
//! Each stage takes the output of the previous stage and returns typed
//! results. Every artifact lands at its fixed [`ArtifactLayout`] path and is
//! fully overwritten on the next run.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use sha2::{Digest, Sha256};
use tracing::{debug, info, info_span};

use ward_ingest::load_visits;
use ward_model::{ArtifactLayout, KpiSummary, ModelMetrics};
use ward_report::{write_frame_csv, write_json_pretty, write_rows_csv};
use ward_synth::{SynthOptions, generate_to_csv};
use ward_train::{GbdtParams, train_readmission_model};

// ============================================================================
// Stage 1: Acquire
// ============================================================================

/// Result of the acquire stage.
#[derive(Debug)]
pub struct AcquireResult {
    /// Typed raw visit table.
    pub frame: DataFrame,
    /// Whether the raw file was generated during this run.
    pub generated: bool,
    /// SHA256 of the raw file, for provenance logging.
    pub fingerprint: String,
}

/// Load the raw patient events, generating them first when the file is
/// absent. `records` and `seed` only apply to the generation path; an
/// existing file is loaded as-is.
pub fn acquire(layout: &ArtifactLayout, records: usize, seed: u64) -> Result<AcquireResult> {
    let raw_path = layout.raw_events();
    let acquire_span = info_span!("acquire", path = %raw_path.display());
    let _acquire_guard = acquire_span.enter();
    let acquire_start = Instant::now();

    let generated = if raw_path.exists() {
        false
    } else {
        let options = SynthOptions {
            records,
            seed,
            ..SynthOptions::default()
        };
        generate_to_csv(&raw_path, &options).context("generate raw patient events")?;
        true
    };

    let frame = load_visits(&raw_path).with_context(|| format!("load {}", raw_path.display()))?;
    let fingerprint = fingerprint_file(&raw_path)?;
    info!(
        records = frame.height(),
        generated,
        fingerprint = %fingerprint,
        duration_ms = acquire_start.elapsed().as_millis(),
        "acquire complete"
    );

    Ok(AcquireResult {
        frame,
        generated,
        fingerprint,
    })
}

// ============================================================================
// Stage 2: Preprocess
// ============================================================================

/// Result of the preprocess stage.
#[derive(Debug)]
pub struct PreprocessResult {
    /// Enriched visit table, input to the training stage.
    pub frame: DataFrame,
    /// Scalar KPI summary as persisted to JSON.
    pub kpis: KpiSummary,
    /// Number of department summary rows written.
    pub departments: usize,
    /// Number of weekly trend rows written.
    pub weeks: usize,
}

/// Run preprocessing over the raw table and persist the processed
/// artifacts: enriched records, department summary, weekly trend, and the
/// KPI summary.
pub fn preprocess(layout: &ArtifactLayout, frame: &DataFrame) -> Result<PreprocessResult> {
    let preprocess_span = info_span!("preprocess");
    let _preprocess_guard = preprocess_span.enter();
    let preprocess_start = Instant::now();

    let result = ward_transform::preprocess(frame).context("preprocess visit table")?;

    let patients_path = layout.processed_patients();
    write_frame_csv(&patients_path, &result.frame)?;
    debug!(
        path = %patients_path.display(),
        rows = result.frame.height(),
        "wrote processed patients"
    );

    let departments_path = layout.department_summary();
    write_rows_csv(&departments_path, &result.departments)?;
    debug!(
        path = %departments_path.display(),
        rows = result.departments.len(),
        "wrote department summary"
    );

    let weekly_path = layout.weekly_trend();
    write_rows_csv(&weekly_path, &result.weekly)?;
    debug!(
        path = %weekly_path.display(),
        rows = result.weekly.len(),
        "wrote weekly trend"
    );

    let kpi_path = layout.kpi_summary();
    write_json_pretty(&kpi_path, &result.kpis)?;
    debug!(path = %kpi_path.display(), "wrote kpi summary");

    info!(
        records = result.frame.height(),
        departments = result.departments.len(),
        weeks = result.weekly.len(),
        duration_ms = preprocess_start.elapsed().as_millis(),
        "preprocess complete"
    );

    Ok(PreprocessResult {
        departments: result.departments.len(),
        weeks: result.weekly.len(),
        frame: result.frame,
        kpis: result.kpis,
    })
}

// ============================================================================
// Stage 3: Train
// ============================================================================

/// Result of the training stage.
#[derive(Debug)]
pub struct TrainResult {
    /// Held-out evaluation metrics as persisted to JSON.
    pub metrics: ModelMetrics,
    /// Number of scored rows written to the predictions artifact.
    pub scored_rows: usize,
}

/// Train the readmission classifier on the enriched table and persist the
/// scored records, model metrics, and serialized model.
pub fn train(layout: &ArtifactLayout, frame: &DataFrame) -> Result<TrainResult> {
    let train_span = info_span!("train");
    let _train_guard = train_span.enter();
    let train_start = Instant::now();

    let model_path = layout.readmission_model();
    let outcome = train_readmission_model(frame, &model_path, &GbdtParams::default())
        .context("train readmission model")?;
    debug!(path = %model_path.display(), "wrote readmission model");

    let predictions_path = layout.predictions();
    write_frame_csv(&predictions_path, &outcome.scored)?;
    debug!(
        path = %predictions_path.display(),
        rows = outcome.scored.height(),
        "wrote predictions"
    );

    let metrics_path = layout.model_metrics();
    write_json_pretty(&metrics_path, &outcome.metrics)?;
    debug!(path = %metrics_path.display(), "wrote model metrics");

    info!(
        rows = outcome.scored.height(),
        roc_auc = outcome.metrics.roc_auc,
        test_accuracy = outcome.metrics.test_accuracy,
        duration_ms = train_start.elapsed().as_millis(),
        "training complete"
    );

    Ok(TrainResult {
        metrics: outcome.metrics,
        scored_rows: outcome.scored.height(),
    })
}

// ============================================================================
// Helper functions
// ============================================================================

/// Buffer size for reading files during fingerprint computation.
const BUFFER_SIZE: usize = 65536; // 64 KB

/// Compute the SHA256 hash of a file as lowercase hex.
pub fn fingerprint_file(path: &Path) -> Result<String> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut reader = BufReader::with_capacity(BUFFER_SIZE, file);

    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];
    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .with_context(|| format!("read {}", path.display()))?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}
