//! `$NAME` / `${NAME}` expansion of env templates

use crate::scope::VariableScope;
use rigger_core::{Error, Result};
use std::fmt;

/// What an undefined reference expands to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExpansionMode {
    /// Undefined references are an error
    #[default]
    Strict,
    /// Undefined references expand to an empty string
    Lenient,
}

#[derive(Debug)]
struct Undefined;

impl fmt::Display for Undefined {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("variable is not defined")
    }
}

// Stands in for `$` inside substituted values so they are not expanded twice
const PROTECTED_DOLLAR: &str = "\u{e000}";

/// Expand `template` against `scope`.
///
/// `${NAME:-fallback}` uses the fallback when `NAME` is undefined, in
/// either mode. A reference without a fallback to an undefined name fails
/// in strict mode and expands to nothing in lenient mode. `variable` names
/// the entry being expanded, for error messages.
pub fn expand(
    variable: &str,
    template: &str,
    scope: &VariableScope,
    mode: ExpansionMode,
) -> Result<String> {
    if !template.contains('$') {
        return Ok(template.to_string());
    }

    // Defined names and fallbacks; undefined references are left in place
    let partial = shellexpand::env_with_context(template, |name: &str| {
        Ok::<_, Undefined>(scope.get(name).map(protect))
    })
    .map_err(|e| lookup_error(variable, template, e))?;

    // Whatever is still a reference had neither a value nor a fallback
    let expanded = shellexpand::env_with_context(partial.as_ref(), |name: &str| {
        if let Some(value) = scope.get(name) {
            return Ok(Some(protect(value)));
        }
        match mode {
            ExpansionMode::Strict => Err(Undefined),
            ExpansionMode::Lenient => Ok(Some(String::new())),
        }
    })
    .map_err(|e| lookup_error(variable, template, e))?;

    Ok(expanded.replace(PROTECTED_DOLLAR, "$"))
}

fn protect(value: &str) -> String {
    value.replace('$', PROTECTED_DOLLAR)
}

fn lookup_error(variable: &str, template: &str, e: shellexpand::LookupError<Undefined>) -> Error {
    Error::expansion(
        variable,
        template,
        format!("'{}': {}", e.var_name, e.cause),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rigger_core::EnvironmentVariables;

    fn scope() -> VariableScope {
        let mut scope = VariableScope::new(
            [("USER".to_string(), "ops".to_string())]
                .into_iter()
                .collect::<EnvironmentVariables>(),
        );
        scope.set("DB_PASS", "s3cr3t");
        scope
    }

    #[test]
    fn test_both_reference_forms() {
        let value = expand(
            "URL",
            "postgres://$USER:${DB_PASS}@db/app",
            &scope(),
            ExpansionMode::Strict,
        )
        .unwrap();
        assert_eq!(value, "postgres://ops:s3cr3t@db/app");
    }

    #[test]
    fn test_undefined_in_strict_mode_is_error() {
        let err = expand("URL", "http://$HOST/", &scope(), ExpansionMode::Strict).unwrap_err();
        assert_eq!(err.kind(), rigger_core::ErrorKind::Validation);
        assert!(err.to_string().contains("HOST"));
        assert!(err.to_string().contains("URL"));
    }

    #[test]
    fn test_undefined_in_lenient_mode_is_empty() {
        let value = expand("URL", "http://$HOST/", &scope(), ExpansionMode::Lenient).unwrap();
        assert_eq!(value, "http:///");
    }

    #[test]
    fn test_fallback_applies_in_strict_mode() {
        let value = expand("PORT", "${PORT:-8080}", &scope(), ExpansionMode::Strict).unwrap();
        assert_eq!(value, "8080");

        let value = expand("PASS", "${DB_PASS:-none}", &scope(), ExpansionMode::Strict).unwrap();
        assert_eq!(value, "s3cr3t");
    }

    #[test]
    fn test_fallback_does_not_cover_a_bare_reference() {
        let empty = VariableScope::default();

        let err = expand("V", "${X:-a} $X", &empty, ExpansionMode::Strict).unwrap_err();
        assert!(matches!(err, Error::Expansion { ref variable, .. } if variable == "V"));

        let value = expand("V", "${X:-a} $X", &empty, ExpansionMode::Lenient).unwrap();
        assert_eq!(value, "a ");
    }

    #[test]
    fn test_substituted_values_are_not_expanded_again() {
        let mut scope = scope();
        scope.set("PASS", "pa$USER${DB_PASS}");

        let value = expand("URL", "db://$PASS@host", &scope, ExpansionMode::Strict).unwrap();
        assert_eq!(value, "db://pa$USER${DB_PASS}@host");
    }

    #[test]
    fn test_template_without_references_is_verbatim() {
        let value = expand("X", "plain ~/value", &scope(), ExpansionMode::Strict).unwrap();
        assert_eq!(value, "plain ~/value");
    }
}
