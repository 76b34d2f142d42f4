//! Vault, dns, hook and deployment blocks of a manifest

use crate::de::{render_scalar, string_map};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::path::PathBuf;

/// A named secret store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vault {
    pub name: String,
    /// `scheme://...`; the scheme selects the driver
    pub uri: String,
    /// Driver-specific parameters
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub with: IndexMap<String, Value>,
    /// Directory relative paths resolve against; unset means the manifest's
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl Vault {
    #[must_use]
    pub fn new(name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uri: uri.into(),
            with: IndexMap::new(),
            base_dir: None,
        }
    }

    /// Add a `with` parameter
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.with.insert(key.into(), Value::String(value.into()));
        self
    }

    /// A `with` parameter rendered as a string. Lists are comma-joined.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<String> {
        self.with
            .get(name)
            .and_then(render_scalar)
            .filter(|value| !value.is_empty())
    }

    /// The URI scheme, if the URI has one
    #[must_use]
    pub fn scheme(&self) -> Option<&str> {
        self.uri
            .split_once("://")
            .map(|(scheme, _)| scheme)
            .filter(|scheme| !scheme.is_empty())
    }
}

/// DNS block; provisioning itself happens elsewhere
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dns {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub driver: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub zone: String,
    #[serde(
        default,
        deserialize_with = "string_map",
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub env: IndexMap<String, String>,
    /// Name of a dns block declared by the workspace
    #[serde(rename = "use", default, skip_serializing_if = "Option::is_none")]
    pub use_: Option<String>,
}

/// Lifecycle hooks, each an ordered list of tasks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Hooks {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub before: Vec<Task>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub after: Vec<Task>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub before_deploy: Vec<Task>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub after_deploy: Vec<Task>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub before_remove: Vec<Task>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub after_remove: Vec<Task>,
}

impl Hooks {
    pub(crate) fn lists_mut(&mut self) -> [&mut Vec<Task>; 6] {
        [
            &mut self.before,
            &mut self.after,
            &mut self.before_deploy,
            &mut self.after_deploy,
            &mut self.before_remove,
            &mut self.after_remove,
        ]
    }

    pub(crate) fn lists(&self) -> [&Vec<Task>; 6] {
        [
            &self.before,
            &self.after,
            &self.before_deploy,
            &self.after_deploy,
            &self.before_remove,
            &self.after_remove,
        ]
    }
}

/// A hook step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Task {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub run: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
    #[serde(deserialize_with = "string_map", skip_serializing_if = "IndexMap::is_empty")]
    pub env: IndexMap<String, String>,
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub use_: Option<String>,
}

/// Deployment driver block, passed through untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Compose {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub sudo: bool,
}

/// Remote access block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ssh {
    pub host: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub user: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub identity: String,
}
