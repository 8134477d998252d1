use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use pt_core::SlaThreshold;

pub const ENV_MODEL_PATH: &str = "ETA_MODEL_PATH";
pub const ENV_SLA_MINUTES: &str = "ETA_SLA_MINUTES";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid {var}={value:?}: {reason}")]
    Env {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub model_path: PathBuf,
    pub sla_minutes: SlaThreshold,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("processing_time_model.json"),
            sla_minutes: SlaThreshold::default(),
        }
    }
}

impl AppConfig {
    /// Defaults, then the optional JSON file, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let cfg = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        cfg.with_env_overrides()
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(value) = std::env::var(ENV_MODEL_PATH) {
            if !value.trim().is_empty() {
                self.model_path = PathBuf::from(value);
            }
        }
        if let Ok(value) = std::env::var(ENV_SLA_MINUTES) {
            let minutes: u32 = value.trim().parse().map_err(|e| ConfigError::Env {
                var: ENV_SLA_MINUTES,
                value: value.clone(),
                reason: format!("{e}"),
            })?;
            self.sla_minutes = SlaThreshold::new(minutes).map_err(|e| ConfigError::Env {
                var: ENV_SLA_MINUTES,
                value: value.clone(),
                reason: e.to_string(),
            })?;
        }
        Ok(self)
    }
}
