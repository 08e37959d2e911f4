//! Harvested per-reviewer answers.

use std::collections::BTreeMap;

use crate::form::{FieldValue, ValueStore};

/// Final evaluation values keyed by (field key, reviewer ordinal)
///
/// Each reviewer is recorded exactly once, at the moment their form
/// completes; recorded values are never changed afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Results {
    by_reviewer: BTreeMap<u32, ValueStore>,
}

impl Results {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a reviewer's values; false if the reviewer already has an entry
    pub fn record(&mut self, reviewer: u32, values: Vec<(String, FieldValue)>) -> bool {
        if self.by_reviewer.contains_key(&reviewer) {
            return false;
        }
        let mut store = ValueStore::new();
        for (key, value) in values {
            store.bind(key, value);
        }
        self.by_reviewer.insert(reviewer, store);
        true
    }

    pub fn get(&self, field: &str, reviewer: u32) -> Option<&FieldValue> {
        self.by_reviewer.get(&reviewer).and_then(|store| store.get(field))
    }

    /// Text value, empty when missing
    pub fn get_string(&self, field: &str, reviewer: u32) -> String {
        self.by_reviewer
            .get(&reviewer)
            .map(|store| store.get_string(field))
            .unwrap_or_default()
    }

    pub fn contains_reviewer(&self, reviewer: u32) -> bool {
        self.by_reviewer.contains_key(&reviewer)
    }

    /// Recorded reviewer ordinals, ascending
    pub fn reviewers(&self) -> impl Iterator<Item = u32> + '_ {
        self.by_reviewer.keys().copied()
    }

    pub fn reviewer_count(&self) -> usize {
        self.by_reviewer.len()
    }

    /// Every (field key, reviewer, value), by reviewer then schema order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32, &FieldValue)> {
        self.by_reviewer
            .iter()
            .flat_map(|(&reviewer, store)| store.iter().map(move |(key, value)| (key, reviewer, value)))
    }

    pub fn is_empty(&self) -> bool {
        self.by_reviewer.is_empty()
    }
}
