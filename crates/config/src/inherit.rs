//! Folding an inheritance chain into one manifest

use crate::manifest::Manifest;
use rigger_core::{Error, Result};
use rigger_utils::paths::{parent_dir, resolve_path};
use std::path::{Path, PathBuf};

impl Manifest {
    /// Merge this manifest's ancestors beneath it.
    ///
    /// Ancestors are folded in declaration order (later wins), then this
    /// manifest is merged last so it wins over all of them. Ancestors that
    /// inherit themselves are resolved relative to their own directory.
    /// Neither `self` nor any ancestor document is modified.
    pub fn resolve_inheritance(&self, base_dir: impl AsRef<Path>) -> Result<Manifest> {
        self.resolve_chain(base_dir.as_ref(), &mut Vec::new())
    }

    /// Load a manifest file and resolve its inheritance chain
    pub fn load_resolved(path: impl AsRef<Path>) -> Result<Manifest> {
        let path = resolve_path(path.as_ref(), current_dir()?);
        let manifest = Manifest::from_file(&path)?;
        let base_dir = parent_dir(&path);
        manifest.resolve_chain(&base_dir, &mut vec![path])
    }

    fn resolve_chain(&self, base_dir: &Path, chain: &mut Vec<PathBuf>) -> Result<Manifest> {
        let ancestors: Vec<&str> = self
            .inherits
            .iter()
            .map(|reference| reference.trim())
            .filter(|reference| !reference.is_empty())
            .collect();

        if ancestors.is_empty() {
            return Ok(self.clone());
        }

        let mut accumulated: Option<Manifest> = None;
        for reference in ancestors {
            let path = resolve_path(reference, base_dir);
            if chain.contains(&path) {
                return Err(Error::validation(format!(
                    "inheritance cycle: '{}' inherits itself",
                    path.display()
                )));
            }

            tracing::debug!(path = %path.display(), "loading ancestor manifest");
            let ancestor = Manifest::from_file(&path)?;

            chain.push(path.clone());
            let resolved = ancestor.resolve_chain(&parent_dir(&path), chain)?;
            chain.pop();

            accumulated = Some(match accumulated {
                None => resolved,
                Some(mut acc) => {
                    acc.merge(&resolved);
                    acc
                }
            });
        }

        let mut merged = accumulated.unwrap_or_default();
        merged.merge(self);
        merged.inherits.clone_from(&self.inherits);
        Ok(merged)
    }
}

fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().map_err(|e| Error::file_system(".", "read current directory", e))
}
