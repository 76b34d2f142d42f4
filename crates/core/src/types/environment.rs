//! Environment-related types for domain-specific operations

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

/// Ordered name/value map used for resolved variables and secrets.
///
/// Insertion order is preserved so that output and expansion follow the
/// manifest's declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvironmentVariables(IndexMap<String, String>);

impl EnvironmentVariables {
    /// Create a new empty environment
    #[must_use]
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Create from an existing map
    #[must_use]
    pub fn from_map(map: IndexMap<String, String>) -> Self {
        Self(map)
    }

    /// Insert a variable, returning the previous value if any.
    /// An existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Get a variable by key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&String> {
        self.0.get(key)
    }

    /// Remove a variable, returning its value if present
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.shift_remove(key)
    }

    /// Check if a variable exists
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Merge another set of environment variables into this one
    /// Variables in `other` will overwrite existing ones
    pub fn merge(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    /// Get the number of variables
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no variables
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get an iterator over the variables in insertion order
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, String> {
        self.0.iter()
    }

    /// Convert to the inner map
    #[must_use]
    pub fn into_inner(self) -> IndexMap<String, String> {
        self.0
    }
}

impl Deref for EnvironmentVariables {
    type Target = IndexMap<String, String>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for EnvironmentVariables {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<IndexMap<String, String>> for EnvironmentVariables {
    fn from(map: IndexMap<String, String>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, String)> for EnvironmentVariables {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for EnvironmentVariables {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a EnvironmentVariables {
    type Item = (&'a String, &'a String);
    type IntoIter = indexmap::map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
