//! Certificates
//!
//! The persisted record of one completed ceremony, how it is assembled from
//! evaluation results, stored as YAML and rendered for printing.

mod assembler;
mod listing;
mod render;
mod store;

pub use assembler::{AssemblyInput, CertificateAssembler};
pub use listing::{find_by_id, find_latest, CertificateEntry};
pub use render::{default_template, CertificateRenderer, MarkdownRenderer};
pub use store::{
    copy_companion_image, load_certificate, resolve_companion_image, save_certificate,
    CertificateStore, YamlStore,
};

use chrono::{DateTime, Local};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certificate {
    /// Nil until assigned; a stored file without one takes its filename stem
    #[serde(default = "Uuid::nil", deserialize_with = "nil_if_null")]
    pub id: Uuid,
    /// The UNIX epoch when a stored file has none
    #[serde(default = "epoch")]
    pub date: DateTime<Local>,
    #[serde(default)]
    pub applicant: String,
    #[serde(default)]
    pub object_name: String,
    /// Reviewer display names, by ordinal
    #[serde(default)]
    pub reviewers: Vec<String>,
    /// One entry per evaluation group, in schema order
    #[serde(default)]
    pub questions: Vec<CertificateQuestion>,
}

impl Default for Certificate {
    fn default() -> Self {
        Self {
            id: Uuid::nil(),
            date: epoch(),
            applicant: String::new(),
            object_name: String::new(),
            reviewers: Vec::new(),
            questions: Vec::new(),
        }
    }
}

fn epoch() -> DateTime<Local> {
    DateTime::<Local>::from(std::time::UNIX_EPOCH)
}

impl Certificate {
    pub fn has_id(&self) -> bool {
        !self.id.is_nil()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateQuestion {
    /// Group title
    pub question: String,
    #[serde(default)]
    pub responses: Vec<CertificateResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateResponse {
    /// Reviewer display name
    pub name: String,
    /// Unweighted rating
    #[serde(default)]
    pub value: i64,
    #[serde(default)]
    pub comment: String,
}

impl CertificateResponse {
    pub fn new(name: impl Into<String>, value: i64, comment: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value,
            comment: comment.into(),
        }
    }
}

fn nil_if_null<'de, D>(deserializer: D) -> std::result::Result<Uuid, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Uuid>::deserialize(deserializer)?.unwrap_or_else(Uuid::nil))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_field_names() {
        let certificate = Certificate {
            id: Uuid::new_v4(),
            applicant: "Ada".into(),
            object_name: "Sachertorte".into(),
            reviewers: vec!["Grace".into()],
            questions: vec![CertificateQuestion {
                question: "Taste".into(),
                responses: vec![CertificateResponse::new("Grace", 4, "rich")],
            }],
            ..Certificate::default()
        };
        let yaml = serde_yaml::to_string(&certificate).unwrap();
        for key in [
            "id:",
            "date:",
            "applicant: Ada",
            "object_name: Sachertorte",
            "reviewers:",
            "questions:",
            "question: Taste",
            "responses:",
            "name: Grace",
            "value: 4",
            "comment: rich",
        ] {
            assert!(yaml.contains(key), "missing `{key}` in:\n{yaml}");
        }
    }

    #[test]
    fn test_missing_or_null_id_is_nil() {
        let yaml = "date: 2024-05-01T10:00:00+02:00\napplicant: Ada\n";
        let certificate: Certificate = serde_yaml::from_str(yaml).unwrap();
        assert!(!certificate.has_id());

        let yaml = "id: ~\ndate: 2024-05-01T10:00:00+02:00\n";
        let certificate: Certificate = serde_yaml::from_str(yaml).unwrap();
        assert!(certificate.id.is_nil());
        assert!(certificate.questions.is_empty());
    }
}
