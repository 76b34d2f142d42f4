use once_cell::sync::Lazy;
use rigger_core::{Error, Result};
use std::env;
use std::sync::RwLock;

/// Global RwLock for thread-safe environment variable access
/// Using RwLock since reads are much more common than writes
static ENV_LOCK: Lazy<RwLock<()>> = Lazy::new(|| RwLock::new(()));

/// Thread-safe process environment operations.
///
/// The resolution pipeline itself never writes here; only an explicit
/// publish of a finished context does.
pub struct SyncEnv;

impl SyncEnv {
    /// Set an environment variable with thread safety
    pub fn set_var<K: AsRef<str>, V: AsRef<str>>(key: K, value: V) -> Result<()> {
        let _guard = ENV_LOCK.write().map_err(|e| {
            Error::configuration(format!("failed to acquire environment write lock: {e}"))
        })?;

        env::set_var(key.as_ref(), value.as_ref());
        Ok(())
    }

    /// Get an environment variable with thread safety
    pub fn var<K: AsRef<str>>(key: K) -> Result<Option<String>> {
        let _guard = ENV_LOCK.read().map_err(|e| {
            Error::configuration(format!("failed to acquire environment read lock: {e}"))
        })?;

        Ok(env::var(key.as_ref()).ok())
    }

    /// Remove an environment variable with thread safety
    pub fn remove_var<K: AsRef<str>>(key: K) -> Result<()> {
        let _guard = ENV_LOCK.write().map_err(|e| {
            Error::configuration(format!("failed to acquire environment write lock: {e}"))
        })?;

        env::remove_var(key.as_ref());
        Ok(())
    }

    /// Get all environment variables with thread safety
    pub fn vars() -> Result<Vec<(String, String)>> {
        let _guard = ENV_LOCK.read().map_err(|e| {
            Error::configuration(format!("failed to acquire environment read lock: {e}"))
        })?;

        Ok(env::vars().collect())
    }
}
