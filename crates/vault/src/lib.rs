//! Secret vaults for `rigger`.
//!
//! A vault is declared in a manifest as a name plus a URI; the URI scheme
//! picks the driver through a [`VaultRegistry`]. The bundled driver keeps
//! secrets in a dotenv file encrypted at rest with `sops`.

pub mod dotenv;
pub mod key;
pub mod registry;
pub mod sops;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod traits;

pub use key::normalize_key;
pub use registry::{VaultConstructor, VaultContext, VaultRegistry, VaultSet};
pub use sops::{SopsCliSecretVault, SopsDriver, SopsParams};
pub use traits::SecretVault;
