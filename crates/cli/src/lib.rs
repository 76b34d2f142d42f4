//! Command-line front end for `rigger`.
//!
//! Every command runs one resolution pass and prints part of the result;
//! nothing here deploys anything.

pub mod commands;
pub mod output;

pub use commands::{Commands, ResolveArgs};
pub use output::OutputFormat;
