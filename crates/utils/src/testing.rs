//! Building blocks for command-executor test doubles

use rigger_core::EnvironmentVariables;
use std::path::PathBuf;
use std::process::{ExitStatus, Output};

/// Build an `ExitStatus` carrying `code`
#[cfg(unix)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    // Raw wait status: exit code lives in the second byte
    ExitStatus::from_raw((code & 0xff) << 8)
}

#[cfg(windows)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    ExitStatus::from_raw(code as u32)
}

/// Build a complete `Output`
#[must_use]
pub fn output(code: i32, stdout: impl Into<Vec<u8>>, stderr: impl Into<Vec<u8>>) -> Output {
    Output {
        status: exit_status(code),
        stdout: stdout.into(),
        stderr: stderr.into(),
    }
}

/// A recorded call made through a test executor
#[derive(Debug, Clone)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: EnvironmentVariables,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_carries_exit_code() {
        let out = output(3, "partial", "boom\n");
        assert_eq!(out.status.code(), Some(3));
        assert!(!out.status.success());
        assert_eq!(out.stdout, b"partial");
        assert_eq!(String::from_utf8_lossy(&out.stderr), "boom\n");
    }

    #[test]
    fn test_exit_status_success() {
        assert!(exit_status(0).success());
    }
}
