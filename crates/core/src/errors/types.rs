//! Core error type definitions

use std::fmt;
use std::path::PathBuf;

/// Result type alias for rigger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for rigger operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed manifest or workspace document
    #[error("failed to parse manifest '{}': {message}", .path.display())]
    ManifestParse {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A file the pass depends on does not exist
    #[error("file not found: '{}'", .path.display())]
    FileNotFound { path: PathBuf },

    /// A secret could not be found in any vault and is not generated
    #[error("secret '{secret}' not found{}", format_vault_suffix(.vault))]
    SecretNotFound {
        secret: String,
        vault: Option<String>,
    },

    /// A vault name is referenced but no vault with that name exists
    #[error("vault '{vault}' not found: {message}")]
    VaultNotFound { vault: String, message: String },

    /// An external tool is not installed or not on PATH
    #[error("tool '{tool}' not found: {message}")]
    ToolNotFound { tool: String, message: String },

    /// A generated secret has no single vault to be persisted into
    #[error("ambiguous vault for secret '{secret}': {message}")]
    AmbiguousVault { secret: String, message: String },

    /// A vault URI uses a scheme no driver is registered for
    #[error("unsupported scheme '{scheme}' for vault '{vault}'")]
    UnsupportedScheme { vault: String, scheme: String },

    /// External command failures
    #[error("{}", format_command_error(.command, .args, .message, .exit_code))]
    CommandExecution {
        command: String,
        args: Vec<String>,
        message: String,
        exit_code: Option<i32>,
    },

    /// File system operations
    #[error("file system {operation} operation failed for '{}': {source}", .path.display())]
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// A vault backend failed while reading or writing its store
    #[error("vault '{vault}' {operation} failed: {message}")]
    Backend {
        vault: String,
        operation: String,
        message: String,
    },

    /// Input that is well-formed but not acceptable
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Template expansion errors
    #[error("failed to expand '{variable}' from '{value}': {message}")]
    Expansion {
        variable: String,
        value: String,
        message: String,
    },

    /// Configuration errors
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Another error with added context
    #[error("{message}: {source}")]
    Context {
        message: String,
        #[source]
        source: Box<Error>,
    },
}

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed manifest or document
    Structural,
    /// Missing file, secret, vault or tool
    NotFound,
    /// No unambiguous target, or a scheme nobody handles
    Ambiguity,
    /// External tool or I/O failure during encrypt/decrypt
    Backend,
    /// Rejected input
    Validation,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Structural => "structural",
            ErrorKind::NotFound => "not-found",
            ErrorKind::Ambiguity => "ambiguity",
            ErrorKind::Backend => "backend",
            ErrorKind::Validation => "validation",
        };
        f.write_str(name)
    }
}

impl Error {
    /// Classify this error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ManifestParse { .. } => ErrorKind::Structural,
            Error::FileNotFound { .. }
            | Error::SecretNotFound { .. }
            | Error::VaultNotFound { .. }
            | Error::ToolNotFound { .. } => ErrorKind::NotFound,
            Error::AmbiguousVault { .. } | Error::UnsupportedScheme { .. } => ErrorKind::Ambiguity,
            Error::CommandExecution { .. } | Error::FileSystem { .. } | Error::Backend { .. } => {
                ErrorKind::Backend
            }
            Error::Validation { .. } | Error::Expansion { .. } | Error::Configuration { .. } => {
                ErrorKind::Validation
            }
            Error::Context { source, .. } => source.kind(),
        }
    }

    /// Whether this error means "the secret is not there"
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

fn format_vault_suffix(vault: &Option<String>) -> String {
    match vault {
        Some(name) => format!(" in vault '{name}'"),
        None => String::new(),
    }
}

fn format_command_error(
    command: &str,
    args: &[String],
    message: &str,
    exit_code: &Option<i32>,
) -> String {
    let args_str = args.join(" ");
    let invocation = if args_str.is_empty() {
        command.to_string()
    } else {
        format!("{command} {args_str}")
    };
    match exit_code {
        Some(code) => format!("command '{invocation}' failed with exit code {code}: {message}"),
        None => format!("command '{invocation}' failed: {message}"),
    }
}
