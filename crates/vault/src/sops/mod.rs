//! Dotenv vault encrypted at rest with the `sops` CLI

mod params;
mod uri;
mod vault;

pub use params::{AgeParams, SopsDriver, SopsParams};
pub use vault::SopsCliSecretVault;
