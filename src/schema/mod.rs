//! Schema
//!
//! Declarative description of the ceremony questionnaire: field groups,
//! fields and the skill-level table. Everything downstream (form builder,
//! sequencer, aggregator, certificate assembler) consumes these types.

mod defaults;

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

pub use defaults::builtin_schema;

/// Suffix identifying the rating field of an evaluation group
pub const RATING_SUFFIX: &str = "_rating";

/// Suffix identifying the comment field of an evaluation group
pub const COMMENT_SUFFIX: &str = "_comment";

/// Runtime identity of a field: `group_key + "_" + field_key`
pub fn build_field_key(group_key: &str, field_key: &str) -> String {
    format!("{}_{}", group_key, field_key)
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Closed set of field types a schema may declare
///
/// Anything else deserializes to `Unknown` and is skipped by the form builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Input,
    Text,
    Select,
    MultiSelect,
    Range,
    FilePicker,
    Confirm,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Input => "input",
            FieldType::Text => "text",
            FieldType::Select => "select",
            FieldType::MultiSelect => "multiselect",
            FieldType::Range => "range",
            FieldType::FilePicker => "filepicker",
            FieldType::Confirm => "confirm",
            FieldType::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

/// One question of a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    #[serde(rename = "type")]
    pub kind: FieldType,

    /// Unique within its group
    pub key: String,

    #[serde(default)]
    pub title: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default)]
    pub mandatory: bool,

    /// Select/multiselect choices, or allowed extensions for a file picker
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affirmative: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative: Option<String>,

    /// A confirm answered with "no" fails validation
    #[serde(default, skip_serializing_if = "is_false")]
    pub require_yes: bool,

    /// Multiplier applied to ratings when summarizing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl FieldDescriptor {
    /// Create a descriptor with everything optional left empty
    pub fn new(kind: FieldType, key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            kind,
            key: key.into(),
            title: title.into(),
            description: String::new(),
            mandatory: false,
            options: Vec::new(),
            affirmative: None,
            negative: None,
            require_yes: false,
            weight: None,
        }
    }

    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn requiring_yes(mut self) -> Self {
        self.require_yes = true;
        self
    }

    /// Weight used by the aggregator; unset or zero counts as 1.0
    pub fn effective_weight(&self) -> f64 {
        match self.weight {
            Some(weight) if weight != 0.0 => weight,
            _ => 1.0,
        }
    }
}

/// A named cluster of related fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDescriptor {
    pub key: String,

    #[serde(rename = "name", default)]
    pub title: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl GroupDescriptor {
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            description: String::new(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Group-qualified key of a field in this group
    pub fn field_key(&self, field: &FieldDescriptor) -> String {
        build_field_key(&self.key, &field.key)
    }

    /// Locate the single `_rating` range field and `_comment` text field
    pub fn rating_and_comment(
        &self,
    ) -> Result<(&FieldDescriptor, &FieldDescriptor), ConfigurationError> {
        let ratings: Vec<&FieldDescriptor> = self
            .fields
            .iter()
            .filter(|f| f.kind == FieldType::Range && self.field_key(f).ends_with(RATING_SUFFIX))
            .collect();
        let comments: Vec<&FieldDescriptor> = self
            .fields
            .iter()
            .filter(|f| f.kind == FieldType::Text && self.field_key(f).ends_with(COMMENT_SUFFIX))
            .collect();

        match (ratings.as_slice(), comments.as_slice()) {
            ([rating], [comment]) => Ok((*rating, *comment)),
            _ => Err(ConfigurationError::RatingCommentPair {
                group: self.key.clone(),
                ratings: ratings.len(),
                comments: comments.len(),
            }),
        }
    }
}

/// One entry of the skill-level threshold table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillLevel {
    pub level: u32,

    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default)]
    pub min_points: f64,
}

impl SkillLevel {
    pub fn new(level: u32, name: impl Into<String>, min_points: f64) -> Self {
        Self {
            level,
            name: name.into(),
            description: String::new(),
            min_points,
        }
    }
}

/// The complete questionnaire of a ceremony
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Filled once by the applicant-facing operator
    #[serde(rename = "datacollection", default)]
    pub data_collection: Vec<GroupDescriptor>,

    /// Filled once per reviewer
    #[serde(default)]
    pub evaluation: Vec<GroupDescriptor>,

    #[serde(rename = "skilllevels", default)]
    pub skill_levels: Vec<SkillLevel>,
}

impl Schema {
    /// Check structural invariants that hold for every group
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for group in self.data_collection.iter().chain(self.evaluation.iter()) {
            let mut seen = HashSet::new();
            for field in &group.fields {
                if !seen.insert(field.key.as_str()) {
                    return Err(ConfigurationError::DuplicateFieldKey {
                        group: group.key.clone(),
                        field: field.key.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Check the rating/comment pair of every evaluation group
    pub fn validate_evaluation_pairs(&self) -> Result<(), ConfigurationError> {
        for group in &self.evaluation {
            group.rating_and_comment()?;
        }
        Ok(())
    }
}
