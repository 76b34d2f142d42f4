use crate::output::OutputFormat;
use clap::{Args, Subcommand};
use eyre::WrapErr;
use rigger_config::Workspace;
use rigger_env::{ContextBuilder, ExecutionContext, ExpansionMode};
use std::io::Write;
use std::path::PathBuf;

pub mod env;
pub mod secrets;

/// Options shared by every command that runs a resolution pass
#[derive(Debug, Clone, Default, Args)]
pub struct ResolveArgs {
    /// Manifest to resolve (default: discover rigger.yaml in the current directory)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Prefer <TARGET>.rigger.yaml during discovery
    #[arg(short, long, global = true)]
    pub target: Option<String>,

    /// Workspace file whose vaults and secrets sit beneath the manifest
    #[arg(short, long, global = true, value_name = "PATH")]
    pub workspace: Option<PathBuf>,

    /// Expand undefined variables to empty strings instead of failing
    #[arg(long, global = true)]
    pub lenient: bool,
}

impl ResolveArgs {
    pub fn builder(&self) -> eyre::Result<ContextBuilder> {
        let mut builder = ContextBuilder::new();
        if let Some(file) = &self.file {
            builder = builder.file(file);
        }
        if let Some(target) = &self.target {
            builder = builder.target(target);
        }
        if let Some(path) = &self.workspace {
            let workspace = Workspace::from_file(path)
                .wrap_err_with(|| format!("loading workspace '{}'", path.display()))?;
            builder = builder.workspace(workspace);
        }
        if self.lenient {
            builder = builder.expansion(ExpansionMode::Lenient);
        }
        Ok(builder)
    }

    pub fn resolve(&self) -> eyre::Result<ExecutionContext> {
        let context = self
            .builder()?
            .build()
            .wrap_err("failed to resolve manifest")?;
        Ok(context)
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the resolved environment (secrets and env entries)
    #[command(visible_alias = "e")]
    Env {
        #[arg(long, value_enum, default_value_t = OutputFormat::Shell)]
        format: OutputFormat,
    },

    /// Print resolved secrets, generating and persisting missing ones
    #[command(visible_alias = "s")]
    Secrets {
        #[arg(long, value_enum, default_value_t = OutputFormat::Shell)]
        format: OutputFormat,

        /// Print only secret names, one per line
        #[arg(long)]
        names: bool,
    },
}

impl Commands {
    pub fn execute(self, resolve: &ResolveArgs, out: &mut dyn Write) -> eyre::Result<()> {
        match self {
            Commands::Env { format } => env::execute(resolve, format, out),
            Commands::Secrets { format, names } => secrets::execute(resolve, format, names, out),
        }
    }
}
