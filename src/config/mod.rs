//! Configuration
//!
//! Application configuration loading and defaults. The configuration file
//! carries the ceremony schema plus an optional alternative data root.

mod paths;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ConfigurationError, Result};
use crate::evaluation::discover_reviewers;
use crate::schema::{builtin_schema, Schema};

pub use paths::AppPaths;

/// Main configuration structure, stored as `config.yaml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Alternative root for the `certificates/` directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_path: Option<PathBuf>,

    /// Questionnaire and skill levels
    #[serde(flatten)]
    pub schema: Schema,
}

impl Config {
    /// Configuration wrapping the built-in schema
    pub fn builtin() -> Result<Self> {
        Ok(Self {
            data_path: None,
            schema: builtin_schema()?,
        })
    }

    /// Load config from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.schema.validate()?;
        discover_reviewers(&config.schema.data_collection)?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Save config to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path.as_ref(), content)?;
        info!(path = %path.as_ref().display(), "configuration written");
        Ok(())
    }

    /// Load from the application directory, writing the built-in default
    /// first when no configuration exists yet
    pub fn load_or_create(paths: &AppPaths) -> Result<Self> {
        let config_file = paths.config_file();
        if !config_file.exists() {
            paths.ensure()?;
            Self::builtin()?.save(&config_file)?;
            info!(path = %config_file.display(), "created default configuration");
        }
        Self::load(config_file)
    }

    /// Root directory certificates are stored under
    pub fn certificates_root(&self, paths: &AppPaths) -> std::result::Result<PathBuf, ConfigurationError> {
        match &self.data_path {
            Some(data_path) if data_path.exists() => Ok(data_path.join(paths::CERTIFICATES_DIR)),
            Some(data_path) => Err(ConfigurationError::DataPathNotFound(data_path.clone())),
            None => Ok(paths.certificates_dir()),
        }
    }
}
