//! Partially collected booking answers

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::FieldKey;

/// Raw answer text per field, filled one key at a time
///
/// Accepted answers are never overwritten; only [`BookingAnswers::clear`]
/// removes them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingAnswers {
    values: BTreeMap<FieldKey, String>,
}

impl BookingAnswers {
    /// Create an empty answer set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an answer for `key`
    ///
    /// Returns `false` and keeps the existing value if `key` is already answered.
    pub fn insert(&mut self, key: FieldKey, text: impl Into<String>) -> bool {
        if self.values.contains_key(&key) {
            return false;
        }
        self.values.insert(key, text.into());
        true
    }

    /// Answer for `key`, if collected
    #[must_use]
    pub fn get(&self, key: FieldKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    /// Whether `key` has been answered
    #[must_use]
    pub fn contains(&self, key: FieldKey) -> bool {
        self.values.contains_key(&key)
    }

    /// Number of answered fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no field has been answered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether every registry field has been answered
    #[must_use]
    pub fn is_complete(&self) -> bool {
        super::next_required_field(self).is_none()
    }

    /// Answers in field order
    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Drop every answer
    pub fn clear(&mut self) {
        self.values.clear();
    }
}
