//! Value slots
//!
//! Every runtime form owns exactly one `ValueStore`. Slots are keyed by the
//! group-qualified field key and never shared between forms, so one
//! reviewer's answers can't show up in another reviewer's form.

use std::collections::HashMap;
use std::fmt;

/// Value held by a field slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Bool(bool),
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(values) => Some(values),
            _ => None,
        }
    }

    /// The empty value of the same shape
    pub fn zeroed(&self) -> Self {
        match self {
            FieldValue::Bool(_) => FieldValue::Bool(false),
            FieldValue::Text(_) => FieldValue::Text(String::new()),
            FieldValue::List(_) => FieldValue::List(Vec::new()),
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            FieldValue::Bool(value) => !value,
            FieldValue::Text(value) => value.is_empty(),
            FieldValue::List(values) => values.is_empty(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(value) => write!(f, "{}", value),
            FieldValue::Text(value) => write!(f, "{}", value),
            FieldValue::List(values) => write!(f, "{}", values.join(", ")),
        }
    }
}

/// Per-form arena of value slots, in schema order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueStore {
    slots: Vec<(String, FieldValue)>,
    index: HashMap<String, usize>,
}

impl ValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a new slot holding `zero`; returns false if the key is taken
    pub fn bind(&mut self, key: impl Into<String>, zero: FieldValue) -> bool {
        let key = key.into();
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key.clone(), self.slots.len());
        self.slots.push((key, zero));
        true
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.index.get(key).map(|&i| &self.slots[i].1)
    }

    /// Overwrite a bound slot; unbound keys are ignored
    pub fn set(&mut self, key: &str, value: FieldValue) -> bool {
        match self.index.get(key) {
            Some(&i) => {
                self.slots[i].1 = value;
                true
            }
            None => false,
        }
    }

    /// Text value of a slot, empty when missing or not text
    pub fn get_string(&self, key: &str) -> String {
        self.get(key)
            .and_then(FieldValue::as_str)
            .unwrap_or_default()
            .to_string()
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key).and_then(FieldValue::as_bool).unwrap_or(false)
    }

    pub fn get_list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .and_then(FieldValue::as_list)
            .map(<[String]>::to_vec)
            .unwrap_or_default()
    }

    /// Copy every value out and reset its slot to the zero value
    pub fn drain_values(&mut self) -> Vec<(String, FieldValue)> {
        self.slots
            .iter_mut()
            .map(|(key, value)| {
                let zero = value.zeroed();
                (key.clone(), std::mem::replace(value, zero))
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.slots.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_rejects_duplicates() {
        let mut store = ValueStore::new();
        assert!(store.bind("taste_rating", FieldValue::text("")));
        assert!(!store.bind("taste_rating", FieldValue::text("5")));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_string("taste_rating"), "");
    }

    #[test]
    fn test_typed_getters() {
        let mut store = ValueStore::new();
        store.bind("a", FieldValue::text(""));
        store.bind("b", FieldValue::Bool(false));
        store.bind("c", FieldValue::List(vec![]));
        store.set("a", FieldValue::text("hello"));
        store.set("b", FieldValue::Bool(true));
        store.set("c", FieldValue::List(vec!["x".into(), "y".into()]));

        assert_eq!(store.get_string("a"), "hello");
        assert!(store.get_bool("b"));
        assert_eq!(store.get_list("c"), vec!["x", "y"]);
        assert_eq!(store.get_string("b"), "");
        assert_eq!(store.get_string("missing"), "");
        assert!(!store.set("missing", FieldValue::text("x")));
    }

    #[test]
    fn test_drain_values_resets_slots() {
        let mut store = ValueStore::new();
        store.bind("taste_rating", FieldValue::text(""));
        store.bind("taste_comment", FieldValue::text(""));
        store.set("taste_rating", FieldValue::text("5"));
        store.set("taste_comment", FieldValue::text("great"));

        let drained = store.drain_values();
        assert_eq!(
            drained,
            vec![
                ("taste_rating".to_string(), FieldValue::text("5")),
                ("taste_comment".to_string(), FieldValue::text("great")),
            ]
        );
        assert!(store.iter().all(|(_, v)| v.is_zero()));
    }

    #[test]
    fn test_display() {
        assert_eq!(FieldValue::List(vec!["a".into(), "b".into()]).to_string(), "a, b");
        assert_eq!(FieldValue::Bool(true).to_string(), "true");
    }
}
