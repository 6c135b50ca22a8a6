//! Helpers for reading typed values out of visit frames.

use polars::prelude::*;

use crate::error::{IngestError, Result};

/// Converts a Polars AnyValue to its CSV cell representation.
/// Null becomes the empty string; floats drop trailing zeros.
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => if b { "1" } else { "0" }.to_string(),
        other => other.to_string(),
    }
}

/// Formats a float without trailing zeros ("3.50" -> "3.5", "4.0" -> "4").
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Parses a string as f64, returning None for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Parses a string as i64, returning None for invalid or empty strings.
pub fn parse_i64(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<i64>().ok()
}

/// Looks up a column, mapping the not-found case to [`IngestError::MissingColumn`].
pub fn require_column<'a>(frame: &'a DataFrame, name: &str) -> Result<&'a Column> {
    frame.column(name).map_err(|_| IngestError::MissingColumn {
        name: name.to_string(),
    })
}

/// Typed view of a required f64 column.
pub fn f64_column<'a>(frame: &'a DataFrame, name: &str) -> Result<&'a Float64Chunked> {
    Ok(require_column(frame, name)?.f64()?)
}

/// Typed view of a required i64 column.
pub fn i64_column<'a>(frame: &'a DataFrame, name: &str) -> Result<&'a Int64Chunked> {
    Ok(require_column(frame, name)?.i64()?)
}

/// Typed view of a required string column.
pub fn str_column<'a>(frame: &'a DataFrame, name: &str) -> Result<&'a StringChunked> {
    Ok(require_column(frame, name)?.str()?)
}
