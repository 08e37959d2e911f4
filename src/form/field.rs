//! Runtime fields
//!
//! A closed variant per field type. Each variant knows the constraint on its
//! value (option set, six-point scale, extension set); mandatory and
//! require-yes rules are attached as validator closures by the builder.

use std::fmt;
use std::path::Path;

use crate::error::ValidationError;

use super::store::FieldValue;

/// Values of the six-point rating scale; "0" means unrated
pub const RATING_SCALE: [&str; 6] = ["0", "1", "2", "3", "4", "5"];

/// Star label for a rating value
pub fn rating_label(value: &str) -> String {
    match value.trim().parse::<usize>() {
        Ok(n) if (1..=5).contains(&n) => "⭐".repeat(n),
        _ => "–".to_string(),
    }
}

pub(crate) type Validator = Box<dyn Fn(&FieldValue) -> Result<(), ValidationError>>;

/// Runtime behaviour of a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Input,
    Text,
    Select { options: Vec<String> },
    MultiSelect { options: Vec<String> },
    Range,
    FilePicker { allowed: Vec<String> },
    Confirm {
        affirmative: String,
        negative: String,
    },
}

impl FieldKind {
    /// Value a freshly bound slot holds
    pub fn zero_value(&self) -> FieldValue {
        match self {
            FieldKind::MultiSelect { .. } => FieldValue::List(Vec::new()),
            FieldKind::Confirm { .. } => FieldValue::Bool(false),
            _ => FieldValue::Text(String::new()),
        }
    }

    fn expected(&self) -> &'static str {
        match self {
            FieldKind::MultiSelect { .. } => "list",
            FieldKind::Confirm { .. } => "boolean",
            _ => "text",
        }
    }

    /// Constraint every value of this kind must satisfy
    fn check(&self, title: &str, value: &FieldValue) -> Result<(), ValidationError> {
        let mismatch = || ValidationError::TypeMismatch {
            title: title.to_string(),
            expected: self.expected(),
        };

        match (self, value) {
            (FieldKind::Input | FieldKind::Text, FieldValue::Text(_)) => Ok(()),
            (FieldKind::Select { options }, FieldValue::Text(text)) => {
                if text.is_empty() || options.is_empty() || options.contains(text) {
                    Ok(())
                } else {
                    Err(ValidationError::UnknownOption {
                        title: title.to_string(),
                        value: text.clone(),
                    })
                }
            }
            (FieldKind::MultiSelect { options }, FieldValue::List(items)) => {
                match items.iter().find(|item| !options.is_empty() && !options.contains(item)) {
                    Some(item) => Err(ValidationError::UnknownOption {
                        title: title.to_string(),
                        value: item.clone(),
                    }),
                    None => Ok(()),
                }
            }
            (FieldKind::Range, FieldValue::Text(text)) => {
                let trimmed = text.trim();
                if trimmed.is_empty() || RATING_SCALE.contains(&trimmed) {
                    Ok(())
                } else {
                    Err(ValidationError::OutOfScale {
                        title: title.to_string(),
                        value: text.clone(),
                    })
                }
            }
            (FieldKind::FilePicker { allowed }, FieldValue::Text(path)) => {
                if path.trim().is_empty() || allowed.is_empty() || has_allowed_extension(path, allowed) {
                    Ok(())
                } else {
                    Err(ValidationError::DisallowedExtension {
                        title: title.to_string(),
                        path: path.clone(),
                        allowed: allowed.join(", "),
                    })
                }
            }
            (FieldKind::Confirm { .. }, FieldValue::Bool(_)) => Ok(()),
            _ => Err(mismatch()),
        }
    }
}

/// Normalize a configured extension to `.ext` lowercase
pub(crate) fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{}", ext)
    }
}

fn has_allowed_extension(path: &str, allowed: &[String]) -> bool {
    Path::new(path.trim())
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| normalize_extension(ext))
        .is_some_and(|ext| allowed.iter().any(|a| *a == ext))
}

/// A field of a runtime form; its value lives in the form's store
pub struct RuntimeField {
    /// Group-qualified key
    pub key: String,
    pub title: String,
    pub description: String,
    pub mandatory: bool,
    pub kind: FieldKind,
    pub(crate) validator: Option<Validator>,
}

impl RuntimeField {
    pub fn new(key: impl Into<String>, title: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            description: String::new(),
            mandatory: false,
            kind,
            validator: None,
        }
    }

    /// Check a candidate value against the kind constraint and the validator
    pub fn validate(&self, value: &FieldValue) -> Result<(), ValidationError> {
        self.kind.check(&self.title, value)?;
        match &self.validator {
            Some(validator) => validator(value),
            None => Ok(()),
        }
    }

    pub fn zero_value(&self) -> FieldValue {
        self.kind.zero_value()
    }
}

impl fmt::Debug for RuntimeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeField")
            .field("key", &self.key)
            .field("title", &self.title)
            .field("mandatory", &self.mandatory)
            .field("kind", &self.kind)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

/// Fails on an empty value
pub(crate) fn required(title: &str) -> Validator {
    let title = title.to_string();
    Box::new(move |value: &FieldValue| {
        let empty = match value {
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Bool(_) => false,
        };
        if empty {
            Err(ValidationError::Required {
                title: title.clone(),
            })
        } else {
            Ok(())
        }
    })
}

/// Like `required`, also rejecting the unrated "0"
pub(crate) fn required_rating(title: &str) -> Validator {
    let title = title.to_string();
    Box::new(move |value: &FieldValue| match value.as_str().map(str::trim) {
        Some("") | Some("0") | None => Err(ValidationError::Required {
            title: title.clone(),
        }),
        Some(_) => Ok(()),
    })
}

/// Fails when a confirm is answered with "no"
pub(crate) fn require_yes(title: &str) -> Validator {
    let title = title.to_string();
    Box::new(move |value: &FieldValue| {
        if value.as_bool() == Some(true) {
            Ok(())
        } else {
            Err(ValidationError::NotConfirmed {
                title: title.clone(),
            })
        }
    })
}
