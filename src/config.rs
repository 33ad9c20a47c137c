use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use crate::error::{PipelineError, Result};

#[derive(Debug, Deserialize)]
pub struct PipelineConfig {
    pub tables: TableConfig,
    pub output: OutputConfig,
}

/// Locations of the reference tables loaded once per batch run.
#[derive(Debug, Deserialize)]
pub struct TableConfig {
    pub category_ranges: PathBuf,
    pub property_taxonomy: PathBuf,
    pub thermal_defaults: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    pub directory: PathBuf,
}

impl PipelineConfig {
    pub fn load(config_path: &str) -> Result<Self> {
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            PipelineError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path, e
            ))
        })?;

        let config: PipelineConfig = toml::from_str(&config_content)?;
        Ok(config)
    }
}
