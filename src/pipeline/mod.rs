mod config;
mod run;

pub use config::{parse_timezone, PipelineConfig, DEFAULT_TIMEZONE};
pub use run::{run, PipelineOutput};
