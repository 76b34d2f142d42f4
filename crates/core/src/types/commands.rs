//! Command-related types for subprocess invocations

use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Type-safe wrapper for command arguments
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandArguments(Vec<String>);

impl CommandArguments {
    /// Create new empty arguments
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Create from a vector of strings
    #[must_use]
    pub fn from_vec(args: Vec<String>) -> Self {
        Self(args)
    }

    /// Add an argument
    pub fn push(&mut self, arg: impl Into<String>) {
        self.0.push(arg.into());
    }

    /// Add a flag followed by its value, skipping it when the value is empty
    pub fn push_flag(&mut self, flag: &str, value: &str) {
        if !value.is_empty() {
            self.0.push(flag.to_string());
            self.0.push(value.to_string());
        }
    }

    /// Add multiple arguments
    pub fn extend<I, S>(&mut self, args: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0.extend(args.into_iter().map(Into::into));
    }

    /// Get the number of arguments
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no arguments
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Convert to inner Vec
    #[must_use]
    pub fn into_inner(self) -> Vec<String> {
        self.0
    }

    /// Get a slice of the arguments
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Deref for CommandArguments {
    type Target = Vec<String>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<String>> for CommandArguments {
    fn from(args: Vec<String>) -> Self {
        Self(args)
    }
}

impl IntoIterator for CommandArguments {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
