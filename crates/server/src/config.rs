//! Server configuration

use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding serialized model artifacts
    #[serde(default = "default_models_dir")]
    pub models_dir: PathBuf,

    /// Labeled dataset used when the autism model must be trained
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,
}

fn default_port() -> u16 {
    5000
}

fn default_models_dir() -> PathBuf {
    PathBuf::from("models")
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("data").join("autism.csv")
}

impl ServerConfig {
    /// Load configuration from the environment (`PREDICTOR_*` variables)
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("PREDICTOR"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_else(|_| ServerConfig {
            port: default_port(),
            models_dir: default_models_dir(),
            dataset_path: default_dataset_path(),
        }))
    }
}
