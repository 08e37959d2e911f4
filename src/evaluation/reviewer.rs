//! Reviewer discovery from the data-collection schema.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ConfigurationError;
use crate::form::ValueStore;
use crate::schema::GroupDescriptor;

/// Matches the group-qualified key of a reviewer name field
static REVIEWER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^reviewer_(\d+)$").unwrap());

/// Ordinal of a `reviewer_<n>` field key
pub fn reviewer_ordinal(key: &str) -> Option<u32> {
    REVIEWER_PATTERN
        .captures(key)
        .and_then(|caps| caps[1].parse::<u32>().ok())
}

/// One panel member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reviewer {
    /// Number taken from the `reviewer_<n>` field key
    pub ordinal: u32,
    /// Group-qualified key of the name field
    pub key: String,
    /// Entered name, or the key when left empty
    pub name: String,
    pub completed: bool,
}

impl Reviewer {
    pub fn new(ordinal: u32, key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            ordinal,
            name: key.clone(),
            key,
            completed: false,
        }
    }

    /// Take the display name from the data-entry answers
    pub fn resolve_name(&mut self, answers: &ValueStore) {
        let entered = answers.get_string(&self.key);
        let entered = entered.trim();
        self.name = if entered.is_empty() {
            self.key.clone()
        } else {
            entered.to_string()
        };
    }
}

/// All `reviewer_<n>` fields, ascending by ordinal
///
/// Gaps between ordinals are allowed; the same ordinal twice is not.
pub fn discover_reviewers(
    data_collection: &[GroupDescriptor],
) -> Result<Vec<Reviewer>, ConfigurationError> {
    let mut found: BTreeMap<u32, Reviewer> = BTreeMap::new();

    for group in data_collection {
        for field in &group.fields {
            let key = group.field_key(field);
            let Some(ordinal) = reviewer_ordinal(&key) else {
                continue;
            };

            if let Some(existing) = found.get(&ordinal) {
                return Err(ConfigurationError::DuplicateReviewer {
                    ordinal,
                    first: existing.key.clone(),
                    second: key,
                });
            }
            found.insert(ordinal, Reviewer::new(ordinal, key));
        }
    }

    Ok(found.into_values().collect())
}
