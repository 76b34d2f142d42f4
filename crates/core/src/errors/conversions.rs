//! Conversion implementations for error types

use super::types::Error;
use std::path::PathBuf;

// Kept manual so the operation shows up in the message
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::FileSystem {
            path: PathBuf::new(),
            operation: "unknown".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Configuration {
            message: format!("JSON error: {error}"),
        }
    }
}
