//! Rendering resolved variables for shells and tools

use clap::ValueEnum;
use rigger_core::EnvironmentVariables;

/// How resolved variables are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `export NAME=value` lines, suitable for `eval`
    #[default]
    Shell,
    /// A single JSON object
    Json,
}

pub fn render(vars: &EnvironmentVariables, format: OutputFormat) -> eyre::Result<String> {
    match format {
        OutputFormat::Shell => {
            let mut out = String::new();
            for (name, value) in vars {
                out.push_str(&export(name, value)?);
                out.push('\n');
            }
            Ok(out)
        }
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(vars)?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// An `export` line for `name`; names that are not shell identifiers are refused
pub fn export(name: &str, value: &str) -> eyre::Result<String> {
    if !is_shell_name(name) {
        eyre::bail!("'{name}' is not a valid shell variable name");
    }
    Ok(format!("export {name}={}", escape(value)))
}

/// `[A-Za-z_][A-Za-z0-9_]*`
fn is_shell_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Single-quote `s` for a POSIX shell unless it is plainly safe
pub fn escape(s: &str) -> String {
    if s.is_empty() {
        return "''".to_string();
    }

    if s.chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '=' | '/' | '.' | '-' | ':'))
    {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len() + 10);
    result.push('\'');
    for c in s.chars() {
        if c == '\'' {
            result.push_str("'\"'\"'");
        } else {
            result.push(c);
        }
    }
    result.push('\'');
    result
}
