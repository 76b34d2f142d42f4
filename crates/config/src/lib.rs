//! Manifest model, discovery and inheritance for `rigger`.
//!
//! A manifest (`rigger.yaml`) declares secrets, the vaults that hold them,
//! environment templates and the deployment blocks consumed downstream.
//! This crate parses manifests and workspaces, locates them on disk and
//! folds inheritance chains into a single merged [`Manifest`].

mod de;
pub mod inherit;
pub mod loader;
pub mod manifest;
pub mod merge;
pub mod workspace;

pub use loader::{find_manifest, LoadedManifest, ManifestLoader};
pub use manifest::{Compose, Dns, Hooks, Manifest, Secret, Ssh, Task, Vault};
pub use workspace::{Discovery, Project, Workspace};
