//! Error types
//!
//! Library-wide error taxonomy. Configuration problems abort the affected
//! operation, validation problems stay local to a form, persistence problems
//! are reported but never roll back in-memory ceremony state.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error for library operations
#[derive(Debug, Error)]
pub enum CeremonyError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("Render error: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("Terminal input error: {0}")]
    Terminal(#[from] dialoguer::Error),
}

/// Malformed schema or ceremony setup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("no reviewers configured (expected at least one `reviewer_<n>` field)")]
    NoReviewers,

    #[error("reviewer ordinal {ordinal} is configured more than once ({first} and {second})")]
    DuplicateReviewer {
        ordinal: u32,
        first: String,
        second: String,
    },

    #[error("field key `{field}` appears more than once in group `{group}`")]
    DuplicateFieldKey { group: String, field: String },

    #[error(
        "evaluation group `{group}` must have exactly one `_rating` range field and one \
         `_comment` text field (found {ratings} rating, {comments} comment)"
    )]
    RatingCommentPair {
        group: String,
        ratings: usize,
        comments: usize,
    },

    #[error("configured data path `{}` not found", .0.display())]
    DataPathNotFound(PathBuf),

    #[error("home directory could not be determined")]
    NoHomeDirectory,
}

/// Local, recoverable form input problem
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{title} is required")]
    Required { title: String },

    #[error("{title} must be confirmed")]
    NotConfirmed { title: String },

    #[error("{title}: `{value}` is not one of the configured options")]
    UnknownOption { title: String, value: String },

    #[error("{title}: `{value}` is not a rating between 0 and 5")]
    OutOfScale { title: String, value: String },

    #[error("{title}: `{path}` does not have an allowed extension ({allowed})")]
    DisallowedExtension {
        title: String,
        path: String,
        allowed: String,
    },

    #[error("{title}: expected a {expected} value")]
    TypeMismatch {
        title: String,
        expected: &'static str,
    },
}

/// Failed write of a certificate or its companion image
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to write `{}`: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read `{}`: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode certificate: {0}")]
    Encode(#[source] serde_yaml::Error),

    #[error("failed to decode `{}`: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

pub type Result<T> = std::result::Result<T, CeremonyError>;
