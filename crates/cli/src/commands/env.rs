use super::ResolveArgs;
use crate::output::{render, OutputFormat};
use std::io::Write;

pub fn execute(resolve: &ResolveArgs, format: OutputFormat, out: &mut dyn Write) -> eyre::Result<()> {
    let context = resolve.resolve()?;
    tracing::debug!(vars = context.env.len(), "rendering environment");
    out.write_all(render(&context.env, format)?.as_bytes())?;
    Ok(())
}
