//! End-to-end readmission training: features, split, fit, score.

use std::path::Path;

use polars::prelude::*;
use tracing::debug;

use ward_model::{ModelMetrics, columns, round_dp};

use crate::error::Result;
use crate::features::{build_feature_matrix, required_column};
use crate::gbdt::{GbdtModel, GbdtParams};
use crate::metrics::{accuracy, roc_auc};
use crate::split::stratified_split;

const TEST_FRACTION: f64 = 0.25;
const SPLIT_SEED: u64 = 42;

const PREDICTION_COLUMNS: [&str; 2] = [
    columns::PREDICTED_READMISSION_PROB,
    columns::PREDICTED_READMISSION_CLASS,
];

/// Scored table plus held-out metrics from one training run.
#[derive(Debug, Clone)]
pub struct TrainOutcome {
    pub scored: DataFrame,
    pub metrics: ModelMetrics,
}

/// Trains the readmission classifier and persists it as JSON.
///
/// Builds the feature matrix from the enriched table, fits on a
/// stratified 75/25 split seeded at 42, evaluates ROC-AUC and accuracy
/// on the held-out quarter, then scores every input row. The model
/// file is written last, so a failed run leaves no model behind.
pub fn train_readmission_model(
    frame: &DataFrame,
    model_path: &Path,
    params: &GbdtParams,
) -> Result<TrainOutcome> {
    let matrix = build_feature_matrix(frame)?;
    let label_column = required_column(frame, columns::READMITTED)?.i64()?;
    let classes: Vec<i64> = label_column
        .into_iter()
        .map(|value| value.unwrap_or(0))
        .collect();
    let targets: Vec<f64> = classes.iter().map(|&class| class as f64).collect();

    let split = stratified_split(&classes, TEST_FRACTION, SPLIT_SEED)?;
    let model = GbdtModel::fit(&matrix, &targets, &split.train, params);

    let probabilities = model.predict(&matrix);
    let predicted: Vec<i64> = probabilities
        .iter()
        .map(|&probability| i64::from(probability >= 0.5))
        .collect();

    let test_targets: Vec<f64> = split.test.iter().map(|&row| targets[row]).collect();
    let test_probabilities: Vec<f64> = split.test.iter().map(|&row| probabilities[row]).collect();
    let test_predicted: Vec<i64> = split.test.iter().map(|&row| predicted[row]).collect();
    let metrics = ModelMetrics {
        roc_auc: round_dp(roc_auc(&test_targets, &test_probabilities), 3),
        test_accuracy: round_dp(accuracy(&test_targets, &test_predicted), 3),
    };
    debug!(
        train = split.train.len(),
        test = split.test.len(),
        roc_auc = metrics.roc_auc,
        test_accuracy = metrics.test_accuracy,
        "evaluated readmission classifier"
    );

    let scored = scored_frame(frame, probabilities, predicted)?;
    model.save(model_path)?;
    Ok(TrainOutcome { scored, metrics })
}

/// Copies the input table and replaces the two prediction columns.
fn scored_frame(
    frame: &DataFrame,
    probabilities: Vec<f64>,
    predicted: Vec<i64>,
) -> Result<DataFrame> {
    let mut out: Vec<Column> = frame
        .get_columns()
        .iter()
        .filter(|column| !PREDICTION_COLUMNS.contains(&column.name().as_str()))
        .cloned()
        .collect();
    out.push(Series::new(columns::PREDICTED_READMISSION_PROB.into(), probabilities).into());
    out.push(Series::new(columns::PREDICTED_READMISSION_CLASS.into(), predicted).into());
    Ok(DataFrame::new(out)?)
}
