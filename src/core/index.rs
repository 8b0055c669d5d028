//! The canonical key → ordinal mapping built from the reference language.

use std::collections::HashMap;

use serde_json::{Map, Value};

use super::parse::ParsedLanguageArtifact;

/// Dense, 0-based ordinals in first-seen order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TranslationKeyIndex {
    ordinals: HashMap<String, usize>,
    keys: Vec<String>,
}

impl TranslationKeyIndex {
    /// Return the key's ordinal, assigning the next one if it is new.
    pub fn insert(&mut self, key: &str) -> usize {
        if let Some(&ordinal) = self.ordinals.get(key) {
            return ordinal;
        }
        let ordinal = self.keys.len();
        self.ordinals.insert(key.to_string(), ordinal);
        self.keys.push(key.to_string());
        ordinal
    }

    pub fn ordinal(&self, key: &str) -> Option<usize> {
        self.ordinals.get(key).copied()
    }

    pub fn key(&self, ordinal: usize) -> Option<&str> {
        self.keys.get(ordinal).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// `(ordinal, key)` pairs in ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.keys.iter().map(String::as_str).enumerate()
    }

    /// The index as a JSON object, keys in ordinal order.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .iter()
            .map(|(ordinal, key)| (key.to_string(), Value::from(ordinal)))
            .collect();
        Value::Object(map)
    }
}

/// Reference-language value per normalized key.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FallbackTable {
    values: HashMap<String, String>,
}

impl FallbackTable {
    pub fn record(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }

    /// The reference value, or `None` when there is none or it is empty.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Text to use when a translation is absent: the reference value, or the
    /// key itself.
    pub fn fallback_for<'a>(&'a self, key: &'a str) -> &'a str {
        self.get(key).unwrap_or(key)
    }
}

#[derive(Debug, Default, Clone)]
pub struct ReferenceIndex {
    pub keys: TranslationKeyIndex,
    pub fallbacks: FallbackTable,
}

/// Build the index from the reference artifact's entries, in dictionary order.
pub fn build_index(reference: &ParsedLanguageArtifact<'_>) -> ReferenceIndex {
    let mut index = ReferenceIndex::default();
    for entry in &reference.entries {
        let key = reference.normalized_key(entry);
        index.keys.insert(&key);
        index
            .fallbacks
            .record(&key, reference.normalized_value(entry));
    }
    index
}
