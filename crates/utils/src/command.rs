use rigger_core::{CommandArguments, EnvironmentVariables, Error, Result};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

/// How a command should be run
#[derive(Debug, Clone, Default)]
pub struct ExecOptions {
    /// Working directory of the child; inherits ours when `None`
    pub cwd: Option<PathBuf>,
    /// Variables added to the inherited environment of the child
    pub env: EnvironmentVariables,
}

impl ExecOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    #[must_use]
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key, value);
        self
    }
}

/// Trait for executing external commands
///
/// Vault drivers shell out through this seam so tests can swap in a scripted
/// implementation instead of the real tool.
pub trait CommandExecutor: Send + Sync {
    /// Run `program` to completion and capture its output.
    ///
    /// A non-zero exit is not an error here; callers inspect `Output::status`.
    fn execute(&self, program: &str, args: &CommandArguments, options: &ExecOptions)
        -> Result<Output>;
}

/// Production implementation that executes real commands
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn execute(
        &self,
        program: &str,
        args: &CommandArguments,
        options: &ExecOptions,
    ) -> Result<Output> {
        // Only argument lists are logged; env values may carry private keys
        tracing::debug!(
            program,
            args = ?args.as_slice(),
            env_keys = ?options.env.keys().collect::<Vec<_>>(),
            "executing command"
        );

        let resolved = locate_tool(program)?;
        let mut command = Command::new(resolved);
        command
            .args(args.as_slice())
            .envs(options.env.iter())
            .stdin(Stdio::null());
        if let Some(cwd) = &options.cwd {
            command.current_dir(cwd);
        }

        command.output().map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => {
                Error::tool_not_found(program, format!("failed to spawn: {e}"))
            }
            _ => Error::command_execution(
                program,
                args.clone().into_inner(),
                format!("failed to execute command: {e}"),
                None,
            ),
        })
    }
}

/// Locate a program. Names without a path separator are looked up on PATH;
/// anything else must point at an existing file.
pub fn locate_tool(program: &str) -> Result<PathBuf> {
    let candidate = Path::new(program);
    if candidate.is_absolute() || candidate.components().count() > 1 {
        if candidate.is_file() {
            return Ok(candidate.to_path_buf());
        }
        return Err(Error::tool_not_found(
            program,
            format!("'{}' does not exist", candidate.display()),
        ));
    }

    which::which(program).map_err(|e| {
        Error::tool_not_found(
            program,
            format!("install '{program}' and make sure it is on PATH: {e}"),
        )
    })
}

/// Trimmed stderr of a failed command, for error messages
#[must_use]
pub fn stderr_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if stderr.is_empty() {
        "no error output".to_string()
    } else {
        stderr
    }
}
