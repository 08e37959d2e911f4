//! Certificate persistence
//!
//! Certificates are stored as YAML under `<root>/<YYYY>/<MM>/<id>.yaml`,
//! with an optional companion image `<id><ext>` next to them.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{PersistenceError, Result};

use super::Certificate;

/// Storage backend for certificates
pub trait CertificateStore {
    fn load(&self, path: &Path) -> Result<Certificate>;

    fn save(&self, path: &Path, certificate: &Certificate) -> Result<()>;

    /// Path a certificate is stored at
    fn location(&self, certificate: &Certificate) -> PathBuf;

    /// Save at the certificate's location, copying the companion image
    ///
    /// A failed image copy is logged; the certificate itself stays saved.
    fn persist(&self, certificate: &Certificate, image: Option<&Path>) -> Result<PathBuf> {
        let path = self.location(certificate);
        self.save(&path, certificate)?;

        if let (Some(image), Some(dir)) = (image, path.parent()) {
            if let Err(err) = copy_companion_image(image, dir, certificate.id) {
                warn!(error = %err, "companion image not copied");
            }
        }
        Ok(path)
    }
}

/// YAML files below a root directory
#[derive(Debug, Clone)]
pub struct YamlStore {
    root: PathBuf,
}

impl YamlStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl CertificateStore for YamlStore {
    fn load(&self, path: &Path) -> Result<Certificate> {
        load_certificate(path)
    }

    fn save(&self, path: &Path, certificate: &Certificate) -> Result<()> {
        save_certificate(path, certificate)
    }

    fn location(&self, certificate: &Certificate) -> PathBuf {
        self.root
            .join(certificate.date.format("%Y").to_string())
            .join(certificate.date.format("%m").to_string())
            .join(format!("{}.yaml", certificate.id))
    }
}

/// Read a certificate; a missing id is taken from the filename stem
pub fn load_certificate(path: &Path) -> Result<Certificate> {
    let content = fs::read_to_string(path).map_err(|source| PersistenceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut certificate: Certificate =
        serde_yaml::from_str(&content).map_err(|source| PersistenceError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

    if !certificate.has_id() {
        match path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(|stem| Uuid::parse_str(stem).ok())
        {
            Some(id) => {
                debug!(path = %path.display(), %id, "certificate id taken from filename");
                certificate.id = id;
            }
            None => warn!(path = %path.display(), "certificate has no id"),
        }
    }

    Ok(certificate)
}

/// Write a certificate, creating parent directories as needed
pub fn save_certificate(path: &Path, certificate: &Certificate) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|source| PersistenceError::Write {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    let content = serde_yaml::to_string(certificate).map_err(PersistenceError::Encode)?;
    fs::write(path, content).map_err(|source| PersistenceError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), id = %certificate.id, "certificate saved");
    Ok(())
}

/// Image to store next to a certificate
///
/// The applicant's selection when it exists, else the fallback image, else
/// none.
pub fn resolve_companion_image(selected: Option<&Path>, fallback: &Path) -> Option<PathBuf> {
    if let Some(selected) = selected {
        if selected.is_file() {
            return Some(selected.to_path_buf());
        }
        warn!(path = %selected.display(), "selected image not found, using default");
    }
    if fallback.is_file() {
        debug!(path = %fallback.display(), "using default image");
        return Some(fallback.to_path_buf());
    }
    info!(path = %fallback.display(), "no default image, certificate stored without one");
    None
}

/// Copy `image` into `dir` as `<id><ext>`
pub fn copy_companion_image(
    image: &Path,
    dir: &Path,
    id: Uuid,
) -> std::result::Result<PathBuf, PersistenceError> {
    let name = match image.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => format!("{id}.{ext}"),
        None => id.to_string(),
    };
    let target = dir.join(name);
    fs::copy(image, &target).map_err(|source| PersistenceError::Write {
        path: target.clone(),
        source,
    })?;
    debug!(from = %image.display(), to = %target.display(), "companion image copied");
    Ok(target)
}
