//! Execution context construction
//!
//! [`ContextBuilder::build`] runs one full resolution pass: locate and parse
//! the manifest, fold its inheritance chain and workspace defaults, open its
//! vaults, resolve secrets and expand env entries.

use crate::expand::ExpansionMode;
use crate::resolver::SecretResolver;
use crate::scope::VariableScope;
use rigger_config::{Manifest, ManifestLoader, Workspace};
use rigger_core::{EnvironmentVariables, Error, Result};
use rigger_utils::command::CommandExecutor;
use rigger_utils::sync::SyncEnv;
use rigger_vault::{VaultContext, VaultRegistry};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A fully resolved manifest, ready to hand to a deployment step
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionContext {
    /// Secrets followed by expanded env entries, in declaration order
    pub env: EnvironmentVariables,
    /// Secret values only, keyed by secret name
    pub secrets: EnvironmentVariables,
    /// The manifest after inheritance and workspace defaults
    pub manifest: Manifest,
    /// Directory of the manifest file
    pub cwd: PathBuf,
}

impl ExecutionContext {
    /// Copy `env` into the process environment
    pub fn publish(&self) -> Result<()> {
        for (name, value) in &self.env {
            SyncEnv::set_var(name, value)?;
        }
        tracing::debug!(count = self.env.len(), "published environment");
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Builder for one resolution pass
pub struct ContextBuilder {
    file: Option<PathBuf>,
    directory: Option<PathBuf>,
    target: Option<String>,
    registry: VaultRegistry,
    executor: Option<Arc<dyn CommandExecutor>>,
    base_env: Option<EnvironmentVariables>,
    workspace: Option<Workspace>,
    expansion: ExpansionMode,
}

impl fmt::Debug for ContextBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextBuilder")
            .field("file", &self.file)
            .field("directory", &self.directory)
            .field("target", &self.target)
            .field("registry", &self.registry)
            .field("workspace", &self.workspace.is_some())
            .field("expansion", &self.expansion)
            .finish_non_exhaustive()
    }
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            file: None,
            directory: None,
            target: None,
            registry: VaultRegistry::with_defaults(),
            executor: None,
            base_env: None,
            workspace: None,
            expansion: ExpansionMode::default(),
        }
    }

    /// Manifest to load; discovery in the current directory when unset
    #[must_use]
    pub fn file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

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

    #[must_use]
    pub fn registry(mut self, registry: VaultRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Runs vault subprocesses; the system executor when unset
    #[must_use]
    pub fn executor(mut self, executor: Arc<dyn CommandExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Environment that expansion and vault drivers fall back to.
    ///
    /// Defaults to a snapshot of the process environment.
    #[must_use]
    pub fn base_env(mut self, env: EnvironmentVariables) -> Self {
        self.base_env = Some(env);
        self
    }

    #[must_use]
    pub fn workspace(mut self, workspace: Workspace) -> Self {
        self.workspace = Some(workspace);
        self
    }

    #[must_use]
    pub fn expansion(mut self, mode: ExpansionMode) -> Self {
        self.expansion = mode;
        self
    }

    pub fn build(self) -> Result<ExecutionContext> {
        let mut loader = ManifestLoader::new();
        if let Some(file) = self.file {
            loader = loader.file(file);
        }
        if let Some(dir) = self.directory {
            loader = loader.directory(dir);
        }
        if let Some(target) = self.target {
            loader = loader.target(target);
        }
        if let Some(workspace) = self.workspace {
            loader = loader.workspace(workspace);
        }
        let loaded = loader.load()?;
        let manifest = loaded.manifest;

        if !manifest.secrets.is_empty() && manifest.vaults.is_empty() {
            return Err(Error::validation(format!(
                "'{}' declares {} secret(s) but no vaults",
                loaded.path.display(),
                manifest.secrets.len()
            )));
        }

        let base_env = match self.base_env {
            Some(env) => env,
            None => SyncEnv::vars()?.into_iter().collect(),
        };

        let mut vault_context = VaultContext::new(&loaded.dir).with_env(base_env.clone());
        if let Some(executor) = self.executor {
            vault_context = vault_context.with_executor(executor);
        }
        let mut vaults = self.registry.open_all(&manifest.vaults, &vault_context)?;

        let mut scope = VariableScope::new(base_env);
        let resolved = SecretResolver::new()
            .with_expansion(self.expansion)
            .resolve(&manifest, &mut vaults, &mut scope)?;

        tracing::info!(
            path = %loaded.path.display(),
            secrets = resolved.secrets.len(),
            vars = resolved.vars.len(),
            "resolved execution context"
        );

        Ok(ExecutionContext {
            env: resolved.vars,
            secrets: resolved.secrets,
            manifest,
            cwd: loaded.dir,
        })
    }
}

/// Resolve the manifest at `path` with default settings
pub fn load_context(path: impl AsRef<Path>) -> Result<ExecutionContext> {
    ContextBuilder::new().file(path.as_ref()).build()
}
