use super::params::SopsParams;
use crate::dotenv;
use crate::key::normalize_key;
use crate::traits::SecretVault;
use indexmap::IndexMap;
use rigger_core::{
    constants::{DEFAULT_VAULT_FILE_MODE, SOPS_BINARY},
    CommandArguments, Error, Result,
};
use rigger_utils::{
    atomic_file::write_atomic_string,
    command::{stderr_message, CommandExecutor, ExecOptions},
    paths::parent_dir,
};
use std::sync::Arc;

/// A dotenv file encrypted with `sops`
///
/// The decrypted contents are cached on first use. Every mutation is
/// written back as a full decrypt → mutate → encrypt round trip.
pub struct SopsCliSecretVault {
    name: String,
    params: SopsParams,
    program: String,
    executor: Arc<dyn CommandExecutor>,
    data: IndexMap<String, String>,
    loaded: bool,
}

impl SopsCliSecretVault {
    pub fn new(
        name: impl Into<String>,
        params: SopsParams,
        executor: Arc<dyn CommandExecutor>,
    ) -> Self {
        Self {
            name: name.into(),
            params,
            program: SOPS_BINARY.to_string(),
            executor,
            data: IndexMap::new(),
            loaded: false,
        }
    }

    /// Run a different `sops` binary
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Replace the cache without touching the file
    pub fn load_data(&mut self, data: IndexMap<String, String>) {
        self.data = data
            .into_iter()
            .map(|(key, value)| (normalize_key(&key), value))
            .collect();
        self.loaded = true;
    }

    fn exec_options(&self) -> ExecOptions {
        ExecOptions {
            cwd: Some(parent_dir(&self.params.file)),
            env: self.params.credential_env(),
        }
    }

    /// Decrypt the file into the cache.
    ///
    /// A file that does not exist yet decrypts to an empty cache.
    pub fn decrypt(&mut self) -> Result<()> {
        if !self.params.file.exists() {
            tracing::debug!(
                vault = %self.name,
                path = %self.params.file.display(),
                "vault file does not exist yet, starting empty"
            );
            self.data.clear();
            self.loaded = true;
            return Ok(());
        }

        let mut args = CommandArguments::new();
        args.push("decrypt");
        args.extend(self.params.config_args());
        args.push(self.params.file.to_string_lossy());

        let output = self
            .executor
            .execute(&self.program, &args, &self.exec_options())?;
        if !output.status.success() {
            return Err(Error::backend(
                &self.name,
                "decrypt",
                stderr_message(&output),
            ));
        }

        let text = String::from_utf8_lossy(&output.stdout);
        let parsed = dotenv::parse(&text).map_err(|e| {
            Error::backend(&self.name, "decrypt", format!("unreadable dotenv output: {e}"))
        })?;

        self.data = parsed
            .into_iter()
            .map(|(key, value)| (normalize_key(&key), value))
            .collect();
        self.loaded = true;
        tracing::debug!(vault = %self.name, keys = self.data.len(), "decrypted vault");
        Ok(())
    }

    /// Write the cache to the file and encrypt it in place
    pub fn encrypt(&mut self) -> Result<()> {
        let plaintext = dotenv::serialize(&self.data);
        write_atomic_string(&self.params.file, &plaintext, DEFAULT_VAULT_FILE_MODE)?;

        let mut args = CommandArguments::new();
        args.push("encrypt");
        args.extend(self.params.config_args());
        args.extend(self.params.driver_args());
        args.push("-i");
        args.push(self.params.file.to_string_lossy());

        let output = self
            .executor
            .execute(&self.program, &args, &self.exec_options())?;
        if !output.status.success() {
            tracing::warn!(
                vault = %self.name,
                path = %self.params.file.display(),
                "encryption failed; the vault file was left in plaintext"
            );
            return Err(Error::backend(
                &self.name,
                "encrypt",
                stderr_message(&output),
            ));
        }

        tracing::debug!(vault = %self.name, keys = self.data.len(), "encrypted vault");
        Ok(())
    }

    fn ensure_loaded(&mut self) -> Result<()> {
        if self.loaded {
            return Ok(());
        }
        self.decrypt()
    }
}

impl SecretVault for SopsCliSecretVault {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_secret_value(&mut self, key: &str) -> Result<String> {
        self.ensure_loaded()?;
        self.data
            .get(&normalize_key(key))
            .cloned()
            .ok_or_else(|| Error::secret_not_found(key, Some(self.name.as_str())))
    }

    fn set_secret_value(&mut self, key: &str, value: &str) -> Result<()> {
        self.ensure_loaded()?;
        self.data.insert(normalize_key(key), value.to_string());
        self.encrypt()
    }

    fn batch_set_secret_values(&mut self, values: &IndexMap<String, String>) -> Result<()> {
        if values.is_empty() {
            return Ok(());
        }

        self.ensure_loaded()?;
        for (key, value) in values {
            self.data.insert(normalize_key(key), value.clone());
        }
        self.encrypt()
    }

    fn delete_secret(&mut self, key: &str) -> Result<()> {
        self.ensure_loaded()?;
        if self.data.shift_remove(&normalize_key(key)).is_some() {
            self.encrypt()?;
        }
        Ok(())
    }

    fn list_secret_names(&mut self) -> Result<Vec<String>> {
        self.ensure_loaded()?;
        Ok(self.data.keys().cloned().collect())
    }
}

impl std::fmt::Debug for SopsCliSecretVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SopsCliSecretVault")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("program", &self.program)
            .field("loaded", &self.loaded)
            .finish_non_exhaustive()
    }
}
