//! Listing stored certificates.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::debug;
use walkdir::WalkDir;

/// Header of a stored certificate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CertificateEntry {
    pub path: PathBuf,
    /// File stem, normally the certificate id
    pub name: String,
    pub date: DateTime<Local>,
    pub applicant: String,
    pub object_name: String,
}

#[derive(Deserialize)]
struct Meta {
    #[serde(default)]
    date: Option<DateTime<Local>>,
    #[serde(default)]
    applicant: String,
    #[serde(default)]
    object_name: String,
}

/// Stored certificates below `root`, newest first, at most `limit`
///
/// The date comes from the file itself, falling back to its modification
/// time. Files that cannot be read as certificates are skipped.
pub fn find_latest(root: &Path, limit: usize) -> Vec<CertificateEntry> {
    let mut entries: Vec<CertificateEntry> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "yaml"))
        .filter_map(|entry| read_entry(entry.path()))
        .collect();

    entries.sort_by(|a, b| b.date.cmp(&a.date));
    entries.truncate(limit);
    entries
}

/// Path of the certificate stored as `<id>.yaml`, if any
pub fn find_by_id(root: &Path, id: &str) -> Option<PathBuf> {
    let file_name = format!("{id}.yaml");
    WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .find(|entry| entry.file_type().is_file() && entry.file_name() == file_name.as_str())
        .map(|entry| entry.into_path())
}

fn read_entry(path: &Path) -> Option<CertificateEntry> {
    let content = std::fs::read_to_string(path).ok()?;
    let meta: Meta = match serde_yaml::from_str(&content) {
        Ok(meta) => meta,
        Err(err) => {
            debug!(path = %path.display(), error = %err, "skipping unreadable certificate");
            return None;
        }
    };

    let date = meta.date.or_else(|| {
        std::fs::metadata(path)
            .and_then(|m| m.modified())
            .ok()
            .map(DateTime::<Local>::from)
    })?;

    Some(CertificateEntry {
        path: path.to_path_buf(),
        name: path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default(),
        date,
        applicant: meta.applicant,
        object_name: meta.object_name,
    })
}
