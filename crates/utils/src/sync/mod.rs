//! Synchronized access to process-global state

pub mod env;

pub use env::SyncEnv;
