// src/config/loader.rs
//! TOML configuration loading and saving

use std::path::Path;

use tracing::debug;

use crate::config::pipeline_config::PipelineConfig;
use crate::error::{SignalError, SignalResult};

/// Load and validate a pipeline configuration from a TOML file.
pub fn load_from_path(path: impl AsRef<Path>) -> SignalResult<PipelineConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        SignalError::config(format!("cannot read {}: {}", path.display(), e))
    })?;
    let config: PipelineConfig = toml::from_str(&content)
        .map_err(|e| SignalError::config(format!("parse error in {}: {}", path.display(), e)))?;
    config.validate()?;
    debug!(path = %path.display(), "configuration loaded");
    Ok(config)
}

/// Write a pipeline configuration as pretty TOML.
pub fn save_to_path(config: &PipelineConfig, path: impl AsRef<Path>) -> SignalResult<()> {
    let path = path.as_ref();
    let content = toml::to_string_pretty(config)
        .map_err(|e| SignalError::config(format!("serialize error: {}", e)))?;
    std::fs::write(path, content).map_err(|e| {
        SignalError::config(format!("cannot write {}: {}", path.display(), e))
    })?;
    Ok(())
}
