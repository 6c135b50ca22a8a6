use polars::prelude::PolarsError;
use thiserror::Error;

use ward_ingest::IngestError;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("empty visit table")]
    EmptyTable,
    #[error("column {column}: invalid date {value:?}")]
    InvalidDate { column: String, value: String },
    #[error("column {column} has no values to aggregate")]
    NoData { column: String },
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, TransformError>;
