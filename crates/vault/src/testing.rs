//! Test doubles: an in-memory vault and a stand-in for the `sops` binary

use crate::traits::SecretVault;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use indexmap::IndexMap;
use rigger_core::{CommandArguments, Error, Result};
use rigger_utils::command::{CommandExecutor, ExecOptions};
use rigger_utils::testing::{output, Invocation};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// A vault kept entirely in memory
#[derive(Debug, Default)]
pub struct MemoryVault {
    name: String,
    data: IndexMap<String, String>,
    failing_reads: bool,
}

impl MemoryVault {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Make every read fail with a backend error
    #[must_use]
    pub fn with_failing_reads(mut self) -> Self {
        self.failing_reads = true;
        self
    }
}

impl SecretVault for MemoryVault {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_secret_value(&mut self, key: &str) -> Result<String> {
        if self.failing_reads {
            return Err(Error::backend(&self.name, "read", "simulated failure"));
        }
        self.data
            .get(key)
            .cloned()
            .ok_or_else(|| Error::secret_not_found(key, Some(self.name.as_str())))
    }

    fn set_secret_value(&mut self, key: &str, value: &str) -> Result<()> {
        self.data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn batch_set_secret_values(&mut self, values: &IndexMap<String, String>) -> Result<()> {
        self.data
            .extend(values.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(())
    }

    fn delete_secret(&mut self, key: &str) -> Result<()> {
        self.data.shift_remove(key);
        Ok(())
    }

    fn list_secret_names(&mut self) -> Result<Vec<String>> {
        Ok(self.data.keys().cloned().collect())
    }
}

const ENVELOPE_HEADER: &str = "FAKESOPS";
const KEY_FLAGS: [&str; 6] = [
    "--age",
    "--azure-kv",
    "--hc-vault-transit",
    "--gcp-kms",
    "--kms",
    "--pgp",
];

/// Stands in for the `sops` binary.
///
/// "Encrypted" files are a header line followed by the base64 of the
/// plaintext, enough to tell plaintext and ciphertext apart on disk.
#[derive(Default)]
pub struct FakeSops {
    invocations: Mutex<Vec<Invocation>>,
    fail_encrypt: AtomicBool,
}

impl FakeSops {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `encrypt` exit non-zero
    pub fn fail_encrypt(&self, fail: bool) {
        self.fail_encrypt.store(fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// How many calls used `subcommand` (`encrypt` or `decrypt`)
    #[must_use]
    pub fn count(&self, subcommand: &str) -> usize {
        self.invocations()
            .iter()
            .filter(|call| call.args.first().map(String::as_str) == Some(subcommand))
            .count()
    }

    /// Write `plaintext` to `path` in encrypted form
    pub fn seal(path: &Path, plaintext: &str) -> std::io::Result<()> {
        fs::write(path, envelope(plaintext))
    }

    /// Decode an encrypted file; `None` when the file is not encrypted
    #[must_use]
    pub fn unseal(path: &Path) -> Option<String> {
        let content = fs::read_to_string(path).ok()?;
        open_envelope(&content)
    }

    fn decrypt(&self, args: &[String], cwd: Option<&Path>) -> Output {
        let Some(file) = args.last() else {
            return output(2, "", "error: missing file argument\n");
        };
        let path = locate(file, cwd);
        let Ok(content) = fs::read_to_string(&path) else {
            return output(2, "", format!("Error: cannot read {}\n", path.display()));
        };
        match open_envelope(&content) {
            Some(plaintext) => output(0, plaintext, ""),
            None => output(
                1,
                "",
                "Error unmarshalling input json: sops metadata not found\n",
            ),
        }
    }

    fn encrypt(&self, args: &[String], cwd: Option<&Path>) -> Output {
        if self.fail_encrypt.load(Ordering::SeqCst) {
            return output(128, "", "Error encrypting the data key with one or more master keys\n");
        }

        let mut in_place = None;
        let mut has_keys = false;
        let mut iter = args.iter().skip(1);
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "-i" => in_place = iter.next(),
                "--config" => {
                    iter.next();
                    has_keys = true;
                }
                flag if KEY_FLAGS.contains(&flag) => {
                    iter.next();
                    has_keys = true;
                }
                _ => {}
            }
        }

        let Some(file) = in_place else {
            return output(2, "", "error: only in-place encryption is scripted\n");
        };
        if !has_keys {
            return output(
                128,
                "",
                "config file not found, or has no creation rules, and no keys provided through command line options\n",
            );
        }

        let path = locate(file, cwd);
        let Ok(plaintext) = fs::read_to_string(&path) else {
            return output(2, "", format!("Error: cannot read {}\n", path.display()));
        };
        if open_envelope(&plaintext).is_some() {
            return output(203, "", "The file you have provided is already encrypted\n");
        }
        match fs::write(&path, envelope(&plaintext)) {
            Ok(()) => output(0, "", ""),
            Err(e) => output(1, "", format!("Error: {e}\n")),
        }
    }
}

impl CommandExecutor for FakeSops {
    fn execute(
        &self,
        program: &str,
        args: &CommandArguments,
        options: &ExecOptions,
    ) -> Result<Output> {
        self.invocations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Invocation {
                program: program.to_string(),
                args: args.as_slice().to_vec(),
                cwd: options.cwd.clone(),
                env: options.env.clone(),
            });

        let cwd = options.cwd.as_deref();
        Ok(match args.first().map(String::as_str) {
            Some("decrypt") => self.decrypt(args.as_slice(), cwd),
            Some("encrypt") => self.encrypt(args.as_slice(), cwd),
            _ => output(2, "", "error: unsupported command\n"),
        })
    }
}

fn locate(file: &str, cwd: Option<&Path>) -> PathBuf {
    match cwd {
        Some(dir) => dir.join(file),
        None => PathBuf::from(file),
    }
}

fn envelope(plaintext: &str) -> String {
    format!("{ENVELOPE_HEADER}\n{}\n", STANDARD.encode(plaintext))
}

fn open_envelope(content: &str) -> Option<String> {
    let body = content.strip_prefix(ENVELOPE_HEADER)?.trim();
    let bytes = STANDARD.decode(body).ok()?;
    String::from_utf8(bytes).ok()
}
