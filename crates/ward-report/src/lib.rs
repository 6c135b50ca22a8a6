pub mod cache;
pub mod readers;
pub mod writers;

pub use cache::ArtifactCache;
pub use readers::{read_json_opt, read_kpi_summary, read_model_metrics};
pub use writers::{write_frame_csv, write_json_pretty, write_rows_csv};
