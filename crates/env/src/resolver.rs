//! Lookup-or-generate resolution of declared secrets

use crate::expand::{expand, ExpansionMode};
use crate::generate::generate_secret;
use crate::scope::VariableScope;
use indexmap::IndexMap;
use rigger_config::{Manifest, Secret};
use rigger_core::{EnvironmentVariables, Error, Result, ResultExt};
use rigger_vault::{SecretVault, VaultSet};

/// Output of one resolution pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedSecrets {
    /// Secret values keyed by secret name
    pub secrets: EnvironmentVariables,
    /// Secrets followed by expanded env entries
    pub vars: EnvironmentVariables,
}

/// Resolves a manifest's secrets against its live vaults and expands its
/// env templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecretResolver {
    mode: ExpansionMode,
}

impl SecretResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_expansion(mut self, mode: ExpansionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Resolve secrets, then expand env entries
    pub fn resolve(
        &self,
        manifest: &Manifest,
        vaults: &mut VaultSet,
        scope: &mut VariableScope,
    ) -> Result<ResolvedSecrets> {
        let mut resolved = self.resolve_secrets(&manifest.secrets, vaults, scope)?;
        self.expand_env(&manifest.env, scope, &mut resolved)?;
        Ok(resolved)
    }

    /// Resolve every secret in declaration order.
    ///
    /// A generated value is persisted before the next secret is looked at,
    /// so a failure later in the list does not undo earlier writes.
    pub fn resolve_secrets(
        &self,
        secrets: &[Secret],
        vaults: &mut VaultSet,
        scope: &mut VariableScope,
    ) -> Result<ResolvedSecrets> {
        if !secrets.is_empty() && vaults.is_empty() {
            return Err(Error::validation(
                "secrets are declared but no vaults are configured",
            ));
        }

        let mut resolved = ResolvedSecrets::default();
        for secret in secrets {
            let value = resolve_one(secret, vaults)?;
            scope.set(&secret.name, &value);
            resolved.vars.insert(&secret.name, &value);
            resolved.secrets.insert(&secret.name, value);
        }
        Ok(resolved)
    }

    /// Expand env entries in order; each result is visible to later entries
    pub fn expand_env(
        &self,
        env: &IndexMap<String, String>,
        scope: &mut VariableScope,
        resolved: &mut ResolvedSecrets,
    ) -> Result<()> {
        for (name, template) in env {
            let value = expand(name, template, scope, self.mode)?;
            scope.set(name, &value);
            resolved.vars.insert(name, value);
        }
        Ok(())
    }
}

fn resolve_one(secret: &Secret, vaults: &mut VaultSet) -> Result<String> {
    let key = secret.storage_key();

    if let Some(value) = lookup(secret, key, vaults)? {
        return Ok(value);
    }

    if !secret.gen {
        return Err(Error::secret_not_found(&secret.name, secret.vault_name()));
    }

    let target = match secret.vault_name() {
        Some(name) => vaults.get_mut(name).ok_or_else(|| undeclared(secret, name))?,
        None => {
            let count = vaults.len();
            vaults.sole_mut().ok_or_else(|| {
                Error::ambiguous_vault(
                    &secret.name,
                    format!("{count} vaults are configured; name one with 'vault'"),
                )
            })?
        }
    };

    let value = generate_secret(secret)?;
    target
        .set_secret_value(key, &value)
        .with_context(|| format!("persisting generated secret '{}'", secret.name))?;
    tracing::info!(
        secret = %secret.name,
        vault = %target.name(),
        size = secret.size,
        "generated secret"
    );
    Ok(value)
}

/// Find a non-empty value for `key`.
///
/// Lookup failures are treated as "not there yet" so the secret can still
/// be generated.
fn lookup(secret: &Secret, key: &str, vaults: &mut VaultSet) -> Result<Option<String>> {
    if let Some(name) = secret.vault_name() {
        let vault = vaults
            .get_mut(name)
            .ok_or_else(|| undeclared(secret, name))?;
        return Ok(read(&mut **vault, key));
    }

    for (_, vault) in vaults.iter_mut() {
        if let Some(value) = read(&mut **vault, key) {
            return Ok(Some(value));
        }
    }
    Ok(None)
}

fn read(vault: &mut dyn SecretVault, key: &str) -> Option<String> {
    match vault.get_secret_value(key) {
        Ok(value) if !value.is_empty() => Some(value),
        Ok(_) => None,
        Err(e) if e.is_not_found() => {
            tracing::debug!(vault = %vault.name(), key, "secret not stored yet");
            None
        }
        Err(e) => {
            tracing::warn!(vault = %vault.name(), key, error = %e, "vault read failed");
            None
        }
    }
}

fn undeclared(secret: &Secret, vault: &str) -> Error {
    Error::vault_not_found(
        vault,
        format!("referenced by secret '{}' but not declared", secret.name),
    )
}
