pub mod generator;

pub use generator::{SynthOptions, default_base_date, generate_to_csv, generate_visits};
