//! Builder methods for creating errors with context

use super::types::Error;
use std::path::PathBuf;

impl Error {
    /// Create a manifest parse error
    #[must_use]
    pub fn manifest_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::ManifestParse {
            path: path.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a manifest parse error with a source error
    #[must_use]
    pub fn manifest_parse_with_source(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::ManifestParse {
            path: path.into(),
            message: message.into(),
            source: Some(source.into()),
        }
    }

    #[must_use]
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Error::FileNotFound { path: path.into() }
    }

    /// Create a missing secret error, optionally scoped to one vault
    #[must_use]
    pub fn secret_not_found(secret: impl Into<String>, vault: Option<&str>) -> Self {
        Error::SecretNotFound {
            secret: secret.into(),
            vault: vault.map(str::to_string),
        }
    }

    #[must_use]
    pub fn vault_not_found(vault: impl Into<String>, message: impl Into<String>) -> Self {
        Error::VaultNotFound {
            vault: vault.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn tool_not_found(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ToolNotFound {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Create an error for a generated secret without a single target vault
    #[must_use]
    pub fn ambiguous_vault(secret: impl Into<String>, message: impl Into<String>) -> Self {
        Error::AmbiguousVault {
            secret: secret.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn unsupported_scheme(vault: impl Into<String>, scheme: impl Into<String>) -> Self {
        Error::UnsupportedScheme {
            vault: vault.into(),
            scheme: scheme.into(),
        }
    }

    /// Create a command execution error
    #[must_use]
    pub fn command_execution(
        command: impl Into<String>,
        args: Vec<String>,
        message: impl Into<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Error::CommandExecution {
            command: command.into(),
            args,
            message: message.into(),
            exit_code,
        }
    }

    /// Create a file system error with context
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    /// Create a vault backend error
    #[must_use]
    pub fn backend(
        vault: impl Into<String>,
        operation: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::Backend {
            vault: vault.into(),
            operation: operation.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
        }
    }

    /// Create a template expansion error
    #[must_use]
    pub fn expansion(
        variable: impl Into<String>,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::Expansion {
            variable: variable.into(),
            value: value.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }
}
