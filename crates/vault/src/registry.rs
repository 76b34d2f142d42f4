//! Scheme → driver lookup and the ordered set of live vaults

use crate::sops::{SopsCliSecretVault, SopsParams};
use crate::traits::SecretVault;
use indexmap::IndexMap;
use rigger_config::Vault;
use rigger_core::{
    constants::{RIGGER_SOPS_BIN_VAR, SOPS_SCHEME},
    EnvironmentVariables, Error, Result,
};
use rigger_utils::command::{CommandExecutor, SystemCommandExecutor};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// What a driver may draw on when it is opened
#[derive(Clone)]
pub struct VaultContext {
    /// Directory of the manifest; relative vault paths resolve against it
    pub base_dir: PathBuf,
    /// Fallback variables, normally a snapshot of the process environment
    pub env: EnvironmentVariables,
    pub executor: Arc<dyn CommandExecutor>,
}

impl VaultContext {
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            env: EnvironmentVariables::new(),
            executor: Arc::new(SystemCommandExecutor),
        }
    }

    #[must_use]
    pub fn with_env(mut self, env: EnvironmentVariables) -> Self {
        self.env = env;
        self
    }

    #[must_use]
    pub fn with_executor(mut self, executor: Arc<dyn CommandExecutor>) -> Self {
        self.executor = executor;
        self
    }
}

impl fmt::Debug for VaultContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultContext")
            .field("base_dir", &self.base_dir)
            .field("env", &self.env.len())
            .finish_non_exhaustive()
    }
}

/// Opens a live vault for one declaration
pub type VaultConstructor =
    Arc<dyn Fn(&Vault, &VaultContext) -> Result<Box<dyn SecretVault>> + Send + Sync>;

/// Drivers keyed by URI scheme
#[derive(Clone, Default)]
pub struct VaultRegistry {
    constructors: IndexMap<String, VaultConstructor>,
}

impl VaultRegistry {
    /// An empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the bundled drivers (`sops`)
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(SOPS_SCHEME, open_sops);
        registry
    }

    /// Register (or replace) the driver for `scheme`
    pub fn register<F>(&mut self, scheme: impl Into<String>, constructor: F)
    where
        F: Fn(&Vault, &VaultContext) -> Result<Box<dyn SecretVault>> + Send + Sync + 'static,
    {
        self.constructors
            .insert(scheme.into().to_ascii_lowercase(), Arc::new(constructor));
    }

    #[must_use]
    pub fn supports(&self, scheme: &str) -> bool {
        self.constructors.contains_key(&scheme.to_ascii_lowercase())
    }

    /// Open the live vault for one declaration
    pub fn open(&self, vault: &Vault, context: &VaultContext) -> Result<Box<dyn SecretVault>> {
        let scheme = vault.scheme().ok_or_else(|| {
            Error::validation(format!(
                "vault '{}' has no scheme in uri '{}'",
                vault.name, vault.uri
            ))
        })?;

        let constructor = self
            .constructors
            .get(&scheme.to_ascii_lowercase())
            .ok_or_else(|| Error::unsupported_scheme(&vault.name, scheme))?;

        tracing::debug!(vault = %vault.name, scheme, "opening vault");
        constructor(vault, context)
    }

    /// Open every declaration, keeping declaration order
    pub fn open_all(&self, vaults: &[Vault], context: &VaultContext) -> Result<VaultSet> {
        let mut set = VaultSet::new();
        for vault in vaults {
            let live = self.open(vault, context)?;
            set.push(vault.name.clone(), live);
        }
        Ok(set)
    }
}

impl fmt::Debug for VaultRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.constructors.keys()).finish()
    }
}

fn open_sops(vault: &Vault, context: &VaultContext) -> Result<Box<dyn SecretVault>> {
    let params = SopsParams::from_vault(vault, &context.base_dir, &context.env)?;
    let mut live = SopsCliSecretVault::new(&vault.name, params, Arc::clone(&context.executor));
    if let Some(program) = context.env.get(RIGGER_SOPS_BIN_VAR).filter(|p| !p.is_empty()) {
        live = live.with_program(program.as_str());
    }
    Ok(Box::new(live))
}

/// Live vaults of one resolution pass, in declaration order
#[derive(Default)]
pub struct VaultSet {
    vaults: Vec<(String, Box<dyn SecretVault>)>,
}

impl VaultSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a vault; a vault with the same name is replaced in place
    pub fn push(&mut self, name: impl Into<String>, vault: Box<dyn SecretVault>) {
        let name = name.into();
        match self.vaults.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = vault,
            None => self.vaults.push((name, vault)),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vaults.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vaults.is_empty()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.vaults.iter().any(|(existing, _)| existing == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vaults.iter().map(|(name, _)| name.as_str())
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Box<dyn SecretVault>> {
        self.vaults
            .iter_mut()
            .find(|(existing, _)| existing == name)
            .map(|(_, vault)| vault)
    }

    /// The only vault, when exactly one is configured
    pub fn sole_mut(&mut self) -> Option<&mut Box<dyn SecretVault>> {
        match self.vaults.as_mut_slice() {
            [(_, vault)] => Some(vault),
            _ => None,
        }
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Box<dyn SecretVault>)> {
        self.vaults
            .iter_mut()
            .map(|(name, vault)| (name.as_str(), vault))
    }
}

impl fmt::Debug for VaultSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
