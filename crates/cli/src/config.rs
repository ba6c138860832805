//! Application Configuration
//!
//! Layered from built-in defaults, an optional TOML file, and
//! `RETURN_RISK_*` environment variables (nested keys use `__`, e.g.
//! `RETURN_RISK_VALIDATION__ALLOW_UNLISTED_STATES=true`).

use config::{Config, Environment, File};
use order_input::ValidationConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File picked up from the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "return-risk.toml";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file {} not found (specified via --config)", .0.display())]
    FileNotFound(PathBuf),
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] config::ConfigError),
    #[error("decision_threshold must be within [0, 1], got {0}")]
    Threshold(f64),
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Model artifact (`.json` CatBoost export or `.onnx`)
    pub model_path: PathBuf,
    /// Probabilities above this are labelled high risk
    pub decision_threshold: f64,
    /// Max log level (`error`, `warn`, `info`, `debug`, `trace`)
    pub log_level: String,
    pub log_format: LogFormat,
    /// Form field ranges and state policy
    pub validation: ValidationConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("catboost_model.json"),
            decision_threshold: 0.5,
            log_level: "warn".to_string(),
            log_format: LogFormat::Text,
            validation: ValidationConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration.
    ///
    /// An explicit `path` must exist; otherwise [`DEFAULT_CONFIG_FILE`] is
    /// read when present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::FileNotFound(path.to_path_buf()));
                }
                builder = builder.add_source(File::from(path));
            }
            None => {
                builder = builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("RETURN_RISK")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.check()?;
        Ok(config)
    }

    /// Reject values no run could use
    pub fn check(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.decision_threshold) {
            return Err(ConfigError::Threshold(self.decision_threshold));
        }
        Ok(())
    }
}
