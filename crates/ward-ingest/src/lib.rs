pub mod csv_read;
pub mod error;
pub mod frame_utils;

pub use csv_read::{load_visits, read_table};
pub use error::{IngestError, Result};
pub use frame_utils::{
    any_to_string, f64_column, format_numeric, i64_column, parse_f64, parse_i64, require_column,
    str_column,
};
