//! Workspace documents: shared vaults, secrets and dns for many projects

use crate::manifest::{read_document, Dns, Manifest, Secret, Vault};
use indexmap::IndexMap;
use rigger_core::{Error, Result};
use rigger_utils::paths::{parent_dir, resolve_path};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

/// Target used when a project is given as a bare path
pub const DEFAULT_TARGET: &str = "default";

/// A workspace (`rigger.workspace.yaml`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Workspace {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub vaults: Vec<Vault>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub secrets: Vec<Secret>,
    /// Named dns blocks that manifests reference through `dns.use`
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub dns: IndexMap<String, Dns>,
    pub projects: IndexMap<String, Project>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discovery: Option<Discovery>,
    /// Directory of the workspace file; its vault paths resolve against it
    #[serde(skip)]
    pub dir: Option<PathBuf>,
}

/// Deployment targets of one project, target name → manifest path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Project {
    pub targets: IndexMap<String, String>,
}

impl<'de> Deserialize<'de> for Project {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Path(String),
            Targets(IndexMap<String, String>),
        }

        let targets = match Repr::deserialize(deserializer)? {
            Repr::Path(path) => IndexMap::from([(DEFAULT_TARGET.to_string(), path)]),
            Repr::Targets(targets) => targets,
        };
        Ok(Self { targets })
    }
}

impl Project {
    /// Manifest path of `target`, or of the default target
    #[must_use]
    pub fn target(&self, target: Option<&str>) -> Option<&str> {
        self.targets
            .get(target.unwrap_or(DEFAULT_TARGET))
            .map(String::as_str)
    }
}

/// Glob patterns for locating projects
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Discovery {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl Workspace {
    /// Parse a workspace from YAML source
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        Self::parse(source, Path::new("<inline>"))
    }

    /// Read and parse a workspace file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = read_document(path)?;
        let mut workspace = Self::parse(&source, path)?;
        workspace.dir = Some(parent_dir(path));
        Ok(workspace)
    }

    fn parse(source: &str, path: &Path) -> Result<Self> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(source)
            .map_err(|e| Error::manifest_parse_with_source(path, e.to_string(), e))
    }

    /// Resolve a project's manifest path relative to `workspace_dir`
    pub fn manifest_path(
        &self,
        project: &str,
        target: Option<&str>,
        workspace_dir: impl AsRef<Path>,
    ) -> Result<PathBuf> {
        let entry = self.projects.get(project).ok_or_else(|| {
            Error::configuration(format!("project '{project}' is not part of the workspace"))
        })?;
        let path = entry.target(target).ok_or_else(|| {
            Error::configuration(format!(
                "project '{project}' has no target '{}'",
                target.unwrap_or(DEFAULT_TARGET)
            ))
        })?;
        Ok(resolve_path(path, workspace_dir))
    }

    /// Layer the workspace's vaults, secrets and dns beneath a manifest.
    ///
    /// Entries the manifest declares itself win. A manifest dns block with
    /// `use` pointing at a workspace dns entry picks up that entry's driver
    /// and env; its own zone, when set, wins. Workspace vaults keep resolving
    /// relative paths against the workspace directory.
    pub fn apply_defaults(&self, manifest: &mut Manifest) {
        let vaults: Vec<Vault> = self
            .vaults
            .iter()
            .cloned()
            .map(|mut vault| {
                if vault.base_dir.is_none() {
                    vault.base_dir.clone_from(&self.dir);
                }
                vault
            })
            .collect();
        manifest.prepend_merge_vaults(&vaults);
        manifest.prepend_merge_secrets(&self.secrets);

        if let Some(dns) = manifest.dns.as_mut() {
            let shared = dns
                .use_
                .as_deref()
                .and_then(|reference| self.dns.get(reference));
            if let Some(shared) = shared {
                dns.driver.clone_from(&shared.driver);
                dns.env.clone_from(&shared.env);
                if dns.zone.is_empty() {
                    dns.zone.clone_from(&shared.zone);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORKSPACE: &str = r#"
name: platform
vaults:
  - name: shared
    uri: sops://./shared.env
secrets:
  - REGISTRY_TOKEN
dns:
  public:
    driver: cloudflare
    zone: example.com
    env:
      CF_TOKEN: ${CLOUDFLARE_TOKEN}
projects:
  api: ./api/rigger.yaml
  web:
    prod: ./web/prod.rigger.yaml
    dev: ./web/dev.rigger.yaml
discovery:
  include: ["services/*"]
"#;

    #[test]
    fn test_project_shorthand() {
        let workspace = Workspace::from_yaml_str(WORKSPACE).unwrap();

        assert_eq!(
            workspace.projects["api"].target(None),
            Some("./api/rigger.yaml")
        );
        assert_eq!(
            workspace.projects["web"].target(Some("dev")),
            Some("./web/dev.rigger.yaml")
        );
        assert_eq!(workspace.projects["web"].target(None), None);
        assert_eq!(workspace.discovery.unwrap().include, vec!["services/*"]);
    }

    #[test]
    fn test_manifest_path() {
        let workspace = Workspace::from_yaml_str(WORKSPACE).unwrap();
        let path = workspace
            .manifest_path("web", Some("prod"), "/srv/platform")
            .unwrap();
        assert_eq!(path, PathBuf::from("/srv/platform/web/prod.rigger.yaml"));

        assert!(workspace.manifest_path("db", None, "/srv").is_err());
        assert!(workspace.manifest_path("web", Some("qa"), "/srv").is_err());
    }

    #[test]
    fn test_apply_defaults() {
        let workspace = Workspace::from_yaml_str(WORKSPACE).unwrap();
        let mut manifest = Manifest::from_yaml_str(
            r#"
secrets: [DB_PASS]
vaults:
  - name: local
    uri: sops://./local.env
dns:
  use: public
  zone: api.example.com
"#,
        )
        .unwrap();

        workspace.apply_defaults(&mut manifest);

        let vaults: Vec<_> = manifest.vaults.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(vaults, vec!["shared", "local"]);
        let secrets: Vec<_> = manifest.secrets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(secrets, vec!["REGISTRY_TOKEN", "DB_PASS"]);

        assert_eq!(manifest.vaults[0].base_dir, None);

        let dns = manifest.dns.unwrap();
        assert_eq!(dns.driver, "cloudflare");
        assert_eq!(dns.zone, "api.example.com");
        assert_eq!(dns.env["CF_TOKEN"], "${CLOUDFLARE_TOKEN}");
    }

    #[test]
    fn test_workspace_vaults_are_anchored_to_the_workspace_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("rigger.workspace.yaml");
        std::fs::write(&path, WORKSPACE).unwrap();
        let workspace = Workspace::from_file(&path).unwrap();
        assert_eq!(workspace.dir.as_deref(), Some(dir.path()));

        let mut manifest = Manifest::from_yaml_str(
            "vaults:\n  - name: local\n    uri: sops://./local.env\n",
        )
        .unwrap();
        workspace.apply_defaults(&mut manifest);

        assert_eq!(manifest.vaults[0].name, "shared");
        assert_eq!(manifest.vaults[0].base_dir.as_deref(), Some(dir.path()));
        assert_eq!(manifest.vaults[1].base_dir, None);
    }
}
