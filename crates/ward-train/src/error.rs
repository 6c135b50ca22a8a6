use std::path::PathBuf;

use polars::error::PolarsError;
use thiserror::Error;

/// Errors raised while building features or fitting the classifier.
#[derive(Debug, Error)]
pub enum TrainError {
    #[error("missing column: {name}")]
    MissingColumn { name: String },

    #[error("label column {column} lacks two classes with two members each; stratified split impossible")]
    DegenerateLabel { column: String },

    #[error("write model {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialize model: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, TrainError>;
