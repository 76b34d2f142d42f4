//! Shared domain types for `rigger`.
//!
//! - **`commands`**: argument lists handed to external tools
//! - **`environment`**: ordered environment variable maps

pub mod commands;
pub mod environment;

pub use commands::*;
pub use environment::*;
