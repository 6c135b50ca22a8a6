//! Artifact writers for pipeline outputs.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::Serialize;

use ward_ingest::any_to_string;

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory: {}", parent.display()))?;
    }
    Ok(())
}

/// Writes a frame as CSV with a header row, creating parent directories.
pub fn write_frame_csv(path: &Path, frame: &DataFrame) -> Result<()> {
    ensure_parent(path)?;
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("write csv: {}", path.display()))?;
    let names = frame.get_column_names();
    writer
        .write_record(names.iter().map(|name| name.as_str()))
        .with_context(|| format!("write header: {}", path.display()))?;
    let columns = frame.get_columns();
    for idx in 0..frame.height() {
        let mut record = Vec::with_capacity(columns.len());
        for column in columns {
            record.push(any_to_string(column.get(idx).unwrap_or(AnyValue::Null)));
        }
        writer
            .write_record(&record)
            .with_context(|| format!("write row {idx}: {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flush csv: {}", path.display()))?;
    Ok(())
}

/// Writes serializable rows as CSV, headers taken from the field names.
pub fn write_rows_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    ensure_parent(path)?;
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("write csv: {}", path.display()))?;
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("serialize row: {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flush csv: {}", path.display()))?;
    Ok(())
}

/// Serializes `payload` as pretty JSON with a trailing newline.
pub fn write_json_pretty<T: Serialize>(path: &Path, payload: &T) -> Result<()> {
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(payload)
        .with_context(|| format!("serialize json: {}", path.display()))?;
    fs::write(path, format!("{json}\n"))
        .with_context(|| format!("write json: {}", path.display()))?;
    Ok(())
}
