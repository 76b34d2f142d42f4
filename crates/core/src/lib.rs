//! Core domain types, errors, and constants for `rigger`.
//!
//! This crate establishes the foundational data structures and error handling
//! used by every other crate in the workspace.
//!
//! ## Key Components
//!
//! - **`errors`**: the `Error` enum, its `ErrorKind` classification and the
//!   `Result` alias. Every failure of a resolution pass ends up here.
//! - **`types`**: `EnvironmentVariables` (ordered name/value map) and
//!   `CommandArguments`.
//! - **`constants`**: file names, environment variable names and secret
//!   generation defaults.

pub mod constants;
pub mod errors;
pub mod types;

pub use self::{
    constants::*,
    errors::{Error, ErrorKind, Result, ResultExt},
    types::*,
};
