//! Numeric feature-matrix construction from an enriched visit table.

use std::collections::BTreeSet;

use polars::prelude::*;
use tracing::debug;

use ward_model::columns;

use crate::error::{Result, TrainError};

/// Columns fed to the classifier as-is.
pub const NUMERIC_FEATURES: &[&str] = &[
    columns::AGE,
    columns::LENGTH_OF_STAY,
    columns::ICU_FLAG,
    columns::COMPLICATION_FLAG,
    columns::MORTALITY_FLAG,
    columns::LAB_SCORE,
    columns::VITAL_RISK_SCORE,
    columns::RISK_SCORE,
    columns::COST_PER_DAY,
    columns::TREATMENT_COST,
    columns::IS_INPATIENT,
    columns::OPD_VISIT,
];

/// Columns expanded into indicator features, first level dropped.
pub const CATEGORICAL_FEATURES: &[&str] = &[
    columns::DEPARTMENT,
    columns::TREATMENT_CATEGORY,
    columns::ADMISSION_TYPE,
    columns::GENDER,
];

/// Dense column-major matrix handed to the booster.
///
/// Missing values are already replaced with zero, so every cell is a
/// plain f64 and row access never allocates.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    names: Vec<String>,
    values: Vec<Vec<f64>>,
    rows: usize,
}

impl FeatureMatrix {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn feature_count(&self) -> usize {
        self.names.len()
    }

    /// Cell lookup; panics on out-of-range indices.
    pub fn value(&self, row: usize, feature: usize) -> f64 {
        self.values[feature][row]
    }

    #[cfg(test)]
    pub(crate) fn from_columns(names: Vec<String>, values: Vec<Vec<f64>>) -> Self {
        let rows = values.first().map_or(0, Vec::len);
        Self {
            names,
            values,
            rows,
        }
    }
}

pub(crate) fn required_column<'a>(frame: &'a DataFrame, name: &str) -> Result<&'a Column> {
    frame.column(name).map_err(|_| TrainError::MissingColumn {
        name: name.to_string(),
    })
}

/// Builds the model input matrix from an enriched visit table.
///
/// Numeric features are cast to f64 with nulls replaced by zero.
/// Categorical features become one indicator column per level beyond
/// the first, named `{column}_{level}`, with levels in lexical order.
pub fn build_feature_matrix(frame: &DataFrame) -> Result<FeatureMatrix> {
    let rows = frame.height();
    let mut names = Vec::new();
    let mut values = Vec::new();

    for &name in NUMERIC_FEATURES {
        let column = required_column(frame, name)?;
        let cast = column.cast(&DataType::Float64)?;
        let chunked = cast.f64()?;
        values.push(chunked.into_iter().map(|cell| cell.unwrap_or(0.0)).collect());
        names.push(name.to_string());
    }

    for &name in CATEGORICAL_FEATURES {
        let column = required_column(frame, name)?;
        let chunked = column.str()?;
        let mut levels = BTreeSet::new();
        for value in chunked.into_iter().flatten() {
            levels.insert(value.to_string());
        }
        for level in levels.into_iter().skip(1) {
            let indicator = chunked
                .into_iter()
                .map(|cell| if cell == Some(level.as_str()) { 1.0 } else { 0.0 })
                .collect();
            values.push(indicator);
            names.push(format!("{name}_{level}"));
        }
    }

    debug!(rows, features = names.len(), "built feature matrix");
    Ok(FeatureMatrix {
        names,
        values,
        rows,
    })
}
