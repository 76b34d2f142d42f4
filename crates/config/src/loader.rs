//! Manifest loader
//!
//! Locates a manifest (explicit file, or discovery in a directory), parses it
//! and optionally resolves its inheritance chain and workspace defaults.

use crate::manifest::Manifest;
use crate::workspace::Workspace;
use rigger_core::{
    constants::{MANIFEST_FILENAME, MANIFEST_FILENAME_ALT, TARGET_MANIFEST_SUFFIX},
    Error, Result,
};
use rigger_utils::paths::{parent_dir, resolve_path};
use std::path::{Path, PathBuf};

/// A manifest together with where it came from
#[derive(Debug, Clone)]
pub struct LoadedManifest {
    /// Absolute path of the manifest file
    pub path: PathBuf,
    /// Directory of the manifest; relative references resolve against it
    pub dir: PathBuf,
    pub manifest: Manifest,
}

/// Builder that finds and loads a manifest
#[derive(Debug, Clone)]
pub struct ManifestLoader {
    file: Option<PathBuf>,
    directory: Option<PathBuf>,
    target: Option<String>,
    workspace: Option<Workspace>,
    resolve_inheritance: bool,
}

impl Default for ManifestLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestLoader {
    /// Create a new loader that discovers in the current directory
    #[must_use]
    pub fn new() -> Self {
        Self {
            file: None,
            directory: None,
            target: None,
            workspace: None,
            resolve_inheritance: true,
        }
    }

    /// Load this file instead of discovering one
    #[must_use]
    pub fn file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Directory to discover in (defaults to the current directory)
    #[must_use]
    pub fn directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.directory = Some(dir.into());
        self
    }

    /// Prefer `<target>.rigger.yaml` during discovery
    #[must_use]
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Layer this workspace's defaults beneath the manifest
    #[must_use]
    pub fn workspace(mut self, workspace: Workspace) -> Self {
        self.workspace = Some(workspace);
        self
    }

    /// Whether to fold in `inherits` (default: yes)
    #[must_use]
    pub fn resolve_inheritance(mut self, resolve: bool) -> Self {
        self.resolve_inheritance = resolve;
        self
    }

    /// Locate the manifest file without loading it
    pub fn locate(&self) -> Result<PathBuf> {
        let cwd = std::env::current_dir()
            .map_err(|e| Error::file_system(".", "read current directory", e))?;

        if let Some(file) = &self.file {
            let path = resolve_path(file, &cwd);
            if !path.is_file() {
                return Err(Error::file_not_found(path));
            }
            return Ok(path);
        }

        let dir = resolve_path(self.directory.as_deref().unwrap_or(Path::new(".")), &cwd);
        find_manifest(&dir, self.target.as_deref())
            .ok_or_else(|| Error::file_not_found(dir.join(expected_name(self.target.as_deref()))))
    }

    /// Locate, parse and resolve the manifest
    pub fn load(self) -> Result<LoadedManifest> {
        let path = self.locate()?;
        let dir = parent_dir(&path);
        tracing::debug!(path = %path.display(), "loading manifest");

        let mut manifest = if self.resolve_inheritance {
            Manifest::load_resolved(&path)?
        } else {
            Manifest::from_file(&path)?
        };

        if let Some(workspace) = &self.workspace {
            workspace.apply_defaults(&mut manifest);
        }

        Ok(LoadedManifest {
            path,
            dir,
            manifest,
        })
    }
}

/// Find a manifest in `dir`.
///
/// With a target, `<target>.rigger.yaml` is tried first; then `rigger.yaml`
/// and `rigger.yml`.
#[must_use]
pub fn find_manifest(dir: &Path, target: Option<&str>) -> Option<PathBuf> {
    let mut candidates = Vec::with_capacity(3);
    if let Some(target) = target.filter(|t| !t.is_empty()) {
        candidates.push(format!("{target}{TARGET_MANIFEST_SUFFIX}"));
    }
    candidates.push(MANIFEST_FILENAME.to_string());
    candidates.push(MANIFEST_FILENAME_ALT.to_string());

    candidates
        .into_iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

fn expected_name(target: Option<&str>) -> String {
    match target.filter(|t| !t.is_empty()) {
        Some(target) => format!("{target}{TARGET_MANIFEST_SUFFIX}"),
        None => MANIFEST_FILENAME.to_string(),
    }
}
