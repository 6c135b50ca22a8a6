//! CLI library components for the Ward Insights pipeline.

pub mod logging;
pub mod pipeline;
