//! Secret resolution and execution contexts for `rigger`.
//!
//! One resolution pass loads a manifest, folds its inheritance chain, opens
//! its vaults, resolves (or generates and persists) every declared secret
//! and expands the `env` templates. The result is an [`ExecutionContext`].
//!
//! The pass threads a [`VariableScope`] instead of writing to the process
//! environment; [`ExecutionContext::publish`] does that on request.

pub mod context;
pub mod expand;
pub mod generate;
pub mod resolver;
pub mod scope;

pub use context::{load_context, ContextBuilder, ExecutionContext};
pub use expand::{expand, ExpansionMode};
pub use generate::{charset, generate_secret};
pub use resolver::{ResolvedSecrets, SecretResolver};
pub use scope::VariableScope;
