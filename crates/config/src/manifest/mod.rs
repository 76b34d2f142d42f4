//! The manifest document

mod secret;
mod types;

pub use secret::Secret;
pub use types::{Compose, Dns, Hooks, Ssh, Task, Vault};

use crate::de::string_map;
use indexmap::IndexMap;
use rigger_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A deployment manifest (`rigger.yaml`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub secrets: Vec<Secret>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub vaults: Vec<Vault>,
    /// Name → template, expanded in declaration order
    #[serde(deserialize_with = "string_map", skip_serializing_if = "IndexMap::is_empty")]
    pub env: IndexMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns: Option<Dns>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hooks: Option<Hooks>,
    /// Ancestor manifests, relative to this manifest's directory
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub inherits: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compose: Option<Compose>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh: Option<Ssh>,
}

impl Manifest {
    /// Parse a manifest from YAML source
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        Self::parse(source, Path::new("<inline>"))
    }

    /// Read and parse a manifest file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = read_document(path)?;
        Self::parse(&source, path)
    }

    fn parse(source: &str, path: &Path) -> Result<Self> {
        // An empty document is an empty manifest
        if source.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(source).map_err(|e| {
            Error::manifest_parse_with_source(path, e.to_string(), e)
        })
    }

    /// Render back to YAML
    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| Error::configuration(format!("failed to serialize manifest: {e}")))
    }

    /// Look up a declared vault by name
    #[must_use]
    pub fn vault(&self, name: &str) -> Option<&Vault> {
        self.vaults.iter().find(|v| v.name == name)
    }

    /// Look up a declared secret by name
    #[must_use]
    pub fn secret(&self, name: &str) -> Option<&Secret> {
        self.secrets.iter().find(|s| s.name == name)
    }
}

/// Read a YAML document, mapping a missing file to `FileNotFound`
pub(crate) fn read_document(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::file_not_found(path),
        _ => Error::file_system(path, "read", e),
    })
}
