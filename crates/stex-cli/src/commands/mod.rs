//! Command implementations.

pub mod config;
pub mod detectors;
pub mod mask;
pub mod parse;
pub mod process;

use std::path::Path;

use stex_core::PipelineConfig;

/// Load the pipeline config from `--config`, the default location, or
/// fall back to defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<PipelineConfig> {
    if let Some(path) = config_path {
        return Ok(PipelineConfig::from_file(Path::new(path))?);
    }
    let default_path = config::default_config_path();
    if default_path.exists() {
        return Ok(PipelineConfig::from_file(&default_path)?);
    }
    Ok(PipelineConfig::default())
}

/// Output format shared by the data-producing commands.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}
