//! Application directory layout under the user's home.

use std::path::{Path, PathBuf};

use crate::error::ConfigurationError;

pub(crate) const CERTIFICATES_DIR: &str = "certificates";

const APP_DIR: &str = ".ceremonymaster";
const CONFIG_FILE: &str = "config.yaml";
const LOGS_DIR: &str = "logs";
const ASSETS_DIR: &str = "assets";
const TEMPLATES_DIR: &str = "templates";

/// Locations of everything the application reads and writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    base: PathBuf,
}

impl AppPaths {
    pub fn new<P: Into<PathBuf>>(base: P) -> Self {
        Self { base: base.into() }
    }

    /// `~/.ceremonymaster`, unless an explicit base is given
    pub fn resolve(base: Option<PathBuf>) -> Result<Self, ConfigurationError> {
        match base {
            Some(base) => Ok(Self::new(base)),
            None => dirs::home_dir()
                .map(|home| Self::new(home.join(APP_DIR)))
                .ok_or(ConfigurationError::NoHomeDirectory),
        }
    }

    /// Create the base directory if missing
    pub fn ensure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.base)
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn config_file(&self) -> PathBuf {
        self.base.join(CONFIG_FILE)
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.base.join(LOGS_DIR)
    }

    pub fn certificates_dir(&self) -> PathBuf {
        self.base.join(CERTIFICATES_DIR)
    }

    /// Companion image used when the applicant picked none
    pub fn default_image(&self) -> PathBuf {
        self.base.join(ASSETS_DIR).join("designer.png")
    }

    /// User override for the certificate renderer template
    pub fn certificate_template(&self) -> PathBuf {
        self.base.join(TEMPLATES_DIR).join("certificate.md.hbs")
    }
}
