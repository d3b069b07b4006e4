use config::{Config as ConfigLoader, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

use super::error::Error;
use common::types::Weight;

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    pub max_waypoints: usize,
    #[serde(default)]
    pub deadline_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChannelConfig {
    pub buffer_size: usize,
}

impl ChannelConfig {
    /// Tokio's bounded channels reject a capacity of zero.
    fn validate(&self) -> Result<(), Error> {
        if self.buffer_size == 0 {
            return Err(Error::ConfigLoadError(
                "channel.buffer_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SimulatorConfig {
    pub total_vertices: usize,
    pub scenario_count: u64,
    pub min_weight: Weight,
    pub max_weight: Weight,
    pub min_budget: Weight,
    pub max_budget: Weight,
    pub interval_ms: u64,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SimulatorConfig {
    fn validate(&self) -> Result<(), Error> {
        if self.total_vertices < 2 {
            return Err(Error::ConfigLoadError(format!(
                "simulator.total_vertices must be at least 2, got {}",
                self.total_vertices
            )));
        }
        if self.min_weight > self.max_weight {
            return Err(Error::ConfigLoadError(format!(
                "simulator.min_weight ({}) exceeds simulator.max_weight ({})",
                self.min_weight, self.max_weight
            )));
        }
        if self.min_budget > self.max_budget {
            return Err(Error::ConfigLoadError(format!(
                "simulator.min_budget ({}) exceeds simulator.max_budget ({})",
                self.min_budget, self.max_budget
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub search: SearchConfig,
    pub channel: ChannelConfig,
    pub simulator: SimulatorConfig,
}

/// Loads configuration from a file and environment variables.
///
/// Without an explicit `path`, `crates/executor/Config.toml` under the current
/// directory is used. Variables such as `EXECUTOR_SEARCH__MAX_WAYPOINTS`
/// override file values.
pub fn load_config(path: Option<&Path>) -> Result<Config, Error> {
    let config_file_path: PathBuf = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let base_path = env::current_dir().map_err(|e| {
                Error::ConfigLoadError(format!("Failed to determine current directory: {}", e))
            })?;
            base_path
                .join("crates")
                .join("executor")
                .join("Config.toml")
        }
    };

    if !config_file_path.exists() {
        return Err(Error::ConfigLoadError(format!(
            "Configuration file not found at calculated path: {}",
            config_file_path.display()
        )));
    }

    let s = ConfigLoader::builder()
        .add_source(File::from(config_file_path.as_path()).required(true))
        .add_source(
            Environment::with_prefix("EXECUTOR")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()
        .map_err(|e| Error::ConfigLoadError(e.to_string()))?;

    let app_config: Config = s
        .try_deserialize()
        .map_err(|e| Error::ConfigLoadError(format!("Failed to deserialize config: {}", e)))?;

    app_config.channel.validate()?;
    app_config.simulator.validate()?;
    Ok(app_config)
}
