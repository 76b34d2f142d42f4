//! Shared utilities for rigger
//!
//! This crate provides the small pieces of plumbing the resolution pipeline
//! leans on: logging setup, path resolution, mode-preserving file
//! replacement, the process environment store and the subprocess seam.

pub mod atomic_file;
pub mod command;
pub mod paths;
pub mod sync;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod tracing;

pub use atomic_file::*;
pub use command::*;
pub use paths::*;
pub use sync::*;
