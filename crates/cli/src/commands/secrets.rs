use super::ResolveArgs;
use crate::output::{render, OutputFormat};
use std::io::Write;

pub fn execute(
    resolve: &ResolveArgs,
    format: OutputFormat,
    names: bool,
    out: &mut dyn Write,
) -> eyre::Result<()> {
    let context = resolve.resolve()?;

    if names {
        for name in context.secrets.keys() {
            writeln!(out, "{name}")?;
        }
        return Ok(());
    }

    out.write_all(render(&context.secrets, format)?.as_bytes())?;
    Ok(())
}
