use clap::Parser;
use rigger::commands::Commands;
use rigger::ResolveArgs;
use std::io::{self, Write};

#[derive(Parser)]
#[command(name = "rigger")]
#[command(about = "Resolve a deployment manifest into its environment and secrets", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    resolve: ResolveArgs,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    rigger_utils::tracing::init(rigger_utils::tracing::level_for_verbosity(cli.verbose))
        .map_err(|e| eyre::eyre!("failed to initialize logging: {e}"))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    cli.command.execute(&cli.resolve, &mut out)?;
    out.flush()?;
    Ok(())
}
