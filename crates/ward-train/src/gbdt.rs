//! Gradient-boosted decision trees for binary classification.
//!
//! Second-order boosting on the logistic loss: each round fits a
//! depth-limited regression tree to the gradient/hessian pairs and
//! leaves carry the shrunken Newton step. Fitting is fully
//! deterministic; no sampling of rows or features takes place.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TrainError};
use crate::features::FeatureMatrix;

/// Splits below this gain are not worth a node.
const MIN_GAIN: f64 = 1e-12;

/// Booster hyperparameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GbdtParams {
    pub trees: usize,
    pub learning_rate: f64,
    pub max_depth: usize,
    pub min_leaf: usize,
    pub l2: f64,
}

impl Default for GbdtParams {
    fn default() -> Self {
        Self {
            trees: 80,
            learning_rate: 0.1,
            max_depth: 3,
            min_leaf: 20,
            l2: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// One regression tree; the root lives at index zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn predict(&self, matrix: &FeatureMatrix, row: usize) -> f64 {
        let mut index = 0;
        loop {
            match self.nodes[index] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if matrix.value(row, feature) <= threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }
}

struct SplitChoice {
    feature: usize,
    threshold: f64,
    gain: f64,
}

fn gain_term(grad: f64, hess: f64, l2: f64) -> f64 {
    grad * grad / (hess + l2)
}

fn sigmoid(score: f64) -> f64 {
    1.0 / (1.0 + (-score).exp())
}

/// Best axis-aligned split over the node's rows, if any clears
/// `MIN_GAIN`. Features are scanned in index order and thresholds in
/// ascending order, so ties resolve to the first candidate found.
fn best_split(
    matrix: &FeatureMatrix,
    grad: &[f64],
    hess: &[f64],
    rows: &[usize],
    params: &GbdtParams,
) -> Option<SplitChoice> {
    let total_grad: f64 = rows.iter().map(|&row| grad[row]).sum();
    let total_hess: f64 = rows.iter().map(|&row| hess[row]).sum();
    let parent = gain_term(total_grad, total_hess, params.l2);

    let mut best: Option<SplitChoice> = None;
    let mut ordered = rows.to_vec();
    for feature in 0..matrix.feature_count() {
        ordered.sort_unstable_by(|&a, &b| {
            matrix
                .value(a, feature)
                .total_cmp(&matrix.value(b, feature))
                .then(a.cmp(&b))
        });
        let mut left_grad = 0.0;
        let mut left_hess = 0.0;
        for (position, window) in ordered.windows(2).enumerate() {
            left_grad += grad[window[0]];
            left_hess += hess[window[0]];
            let here = matrix.value(window[0], feature);
            let next = matrix.value(window[1], feature);
            if here == next {
                continue;
            }
            let left_count = position + 1;
            if left_count < params.min_leaf || ordered.len() - left_count < params.min_leaf {
                continue;
            }
            let gain = 0.5
                * (gain_term(left_grad, left_hess, params.l2)
                    + gain_term(total_grad - left_grad, total_hess - left_hess, params.l2)
                    - parent);
            if gain > best.as_ref().map_or(MIN_GAIN, |choice| choice.gain) {
                best = Some(SplitChoice {
                    feature,
                    threshold: 0.5 * (here + next),
                    gain,
                });
            }
        }
    }
    best
}

fn push_leaf(
    nodes: &mut Vec<Node>,
    grad: &[f64],
    hess: &[f64],
    rows: &[usize],
    params: &GbdtParams,
) -> usize {
    let total_grad: f64 = rows.iter().map(|&row| grad[row]).sum();
    let total_hess: f64 = rows.iter().map(|&row| hess[row]).sum();
    let value = params.learning_rate * (-total_grad / (total_hess + params.l2));
    nodes.push(Node::Leaf { value });
    nodes.len() - 1
}

fn grow(
    nodes: &mut Vec<Node>,
    matrix: &FeatureMatrix,
    grad: &[f64],
    hess: &[f64],
    rows: Vec<usize>,
    depth: usize,
    params: &GbdtParams,
) -> usize {
    if depth >= params.max_depth || rows.len() < 2 * params.min_leaf {
        return push_leaf(nodes, grad, hess, &rows, params);
    }
    let Some(choice) = best_split(matrix, grad, hess, &rows, params) else {
        return push_leaf(nodes, grad, hess, &rows, params);
    };

    let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
        .into_iter()
        .partition(|&row| matrix.value(row, choice.feature) <= choice.threshold);

    nodes.push(Node::Split {
        feature: choice.feature,
        threshold: choice.threshold,
        left: 0,
        right: 0,
    });
    let index = nodes.len() - 1;
    let left = grow(nodes, matrix, grad, hess, left_rows, depth + 1, params);
    let right = grow(nodes, matrix, grad, hess, right_rows, depth + 1, params);
    if let Node::Split {
        left: left_slot,
        right: right_slot,
        ..
    } = &mut nodes[index]
    {
        *left_slot = left;
        *right_slot = right;
    }
    index
}

/// A fitted boosted-tree classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GbdtModel {
    pub params: GbdtParams,
    pub feature_names: Vec<String>,
    base_score: f64,
    trees: Vec<Tree>,
}

impl GbdtModel {
    /// Fits the booster on the given training rows.
    ///
    /// `labels` holds 0.0/1.0 targets for every matrix row; only the
    /// rows listed in `train` contribute to the fit. `train` must not
    /// be empty.
    pub fn fit(
        matrix: &FeatureMatrix,
        labels: &[f64],
        train: &[usize],
        params: &GbdtParams,
    ) -> Self {
        let positives: f64 = train.iter().map(|&row| labels[row]).sum();
        let prior = positives / train.len() as f64;
        let base_score = (prior / (1.0 - prior)).ln();

        let mut scores = vec![base_score; labels.len()];
        let mut grad = vec![0.0; labels.len()];
        let mut hess = vec![0.0; labels.len()];
        let mut trees = Vec::with_capacity(params.trees);
        for _ in 0..params.trees {
            for &row in train {
                let prob = sigmoid(scores[row]);
                grad[row] = prob - labels[row];
                hess[row] = prob * (1.0 - prob);
            }
            let mut nodes = Vec::new();
            grow(&mut nodes, matrix, &grad, &hess, train.to_vec(), 0, params);
            let tree = Tree { nodes };
            for &row in train {
                scores[row] += tree.predict(matrix, row);
            }
            trees.push(tree);
        }
        debug!(
            rows = train.len(),
            trees = trees.len(),
            "fitted boosted classifier"
        );

        Self {
            params: params.clone(),
            feature_names: matrix.names().to_vec(),
            base_score,
            trees,
        }
    }

    /// Predicted positive-class probability for every matrix row.
    pub fn predict(&self, matrix: &FeatureMatrix) -> Vec<f64> {
        (0..matrix.rows())
            .map(|row| {
                let mut score = self.base_score;
                for tree in &self.trees {
                    score += tree.predict(matrix, row);
                }
                sigmoid(score)
            })
            .collect()
    }

    /// Writes the model as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| TrainError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, format!("{json}\n")).map_err(|source| TrainError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads a model back from its JSON form.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| TrainError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_feature_matrix(values: Vec<f64>) -> FeatureMatrix {
        FeatureMatrix::from_columns(vec!["signal".to_string()], vec![values])
    }

    fn toy_params() -> GbdtParams {
        GbdtParams {
            trees: 30,
            learning_rate: 0.3,
            max_depth: 2,
            min_leaf: 1,
            l2: 1.0,
        }
    }

    #[test]
    fn separable_data_is_separated() {
        let values: Vec<f64> = (0..20)
            .map(|i| if i < 10 { -1.0 - i as f64 } else { 1.0 + i as f64 })
            .collect();
        let labels: Vec<f64> = (0..20).map(|i| if i < 10 { 0.0 } else { 1.0 }).collect();
        let matrix = single_feature_matrix(values);
        let train: Vec<usize> = (0..20).collect();

        let model = GbdtModel::fit(&matrix, &labels, &train, &toy_params());
        let probabilities = model.predict(&matrix);
        for (row, probability) in probabilities.iter().enumerate() {
            if labels[row] > 0.5 {
                assert!(*probability > 0.9, "row {row}: {probability}");
            } else {
                assert!(*probability < 0.1, "row {row}: {probability}");
            }
        }
    }

    #[test]
    fn min_leaf_at_dataset_size_keeps_the_prior() {
        let matrix = single_feature_matrix(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        let labels = vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0];
        let train: Vec<usize> = (0..8).collect();
        let params = GbdtParams {
            min_leaf: 8,
            ..toy_params()
        };

        let model = GbdtModel::fit(&matrix, &labels, &train, &params);
        let probabilities = model.predict(&matrix);
        for probability in probabilities {
            assert!((probability - 0.25).abs() < 1e-9);
        }
    }

    #[test]
    fn saved_model_reloads_with_identical_predictions() {
        let values: Vec<f64> = (0..16).map(|i| (i as f64).sin() * 3.0).collect();
        let labels: Vec<f64> = (0..16).map(|i| f64::from(u8::from(i % 3 == 0))).collect();
        let matrix = single_feature_matrix(values);
        let train: Vec<usize> = (0..16).collect();
        let model = GbdtModel::fit(&matrix, &labels, &train, &toy_params());

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("models/readmission.json");
        model.save(&path).expect("save");
        let reloaded = GbdtModel::load(&path).expect("load");

        assert_eq!(model.predict(&matrix), reloaded.predict(&matrix));
        assert_eq!(model.feature_names, reloaded.feature_names);
    }
}
