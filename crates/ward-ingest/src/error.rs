use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("read csv {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("missing column: {name}")]
    MissingColumn { name: String },
    #[error("column {column} row {row}: invalid date {value:?}")]
    InvalidDate {
        column: String,
        row: usize,
        value: String,
    },
    #[error("column {column} row {row}: invalid number {value:?}")]
    InvalidNumber {
        column: String,
        row: usize,
        value: String,
    },
    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, IngestError>;
