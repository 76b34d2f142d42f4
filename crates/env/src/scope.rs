use rigger_core::{EnvironmentVariables, Result};
use rigger_utils::sync::SyncEnv;

/// Variables visible to expansion during one resolution pass
///
/// Lookups see values set during the pass first, then the base
/// environment the pass started with.
#[derive(Debug, Clone, Default)]
pub struct VariableScope {
    base: EnvironmentVariables,
    vars: EnvironmentVariables,
}

impl VariableScope {
    #[must_use]
    pub fn new(base: EnvironmentVariables) -> Self {
        Self {
            base,
            vars: EnvironmentVariables::new(),
        }
    }

    /// A scope based on a snapshot of the process environment
    pub fn from_process() -> Result<Self> {
        let base = SyncEnv::vars()?.into_iter().collect();
        Ok(Self::new(base))
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .or_else(|| self.base.get(name))
            .map(String::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name, value);
    }

    /// Values set during the pass, in the order they were first set
    #[must_use]
    pub fn vars(&self) -> &EnvironmentVariables {
        &self.vars
    }

    #[must_use]
    pub fn base(&self) -> &EnvironmentVariables {
        &self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_values_shadow_base() {
        let base: EnvironmentVariables = [
            ("HOME".to_string(), "/home/ops".to_string()),
            ("REGION".to_string(), "eu".to_string()),
        ]
        .into_iter()
        .collect();
        let mut scope = VariableScope::new(base);

        scope.set("REGION", "us");

        assert_eq!(scope.get("REGION"), Some("us"));
        assert_eq!(scope.get("HOME"), Some("/home/ops"));
        assert_eq!(scope.get("MISSING"), None);
        assert_eq!(scope.vars().len(), 1);
        assert_eq!(scope.base().get("REGION").map(String::as_str), Some("eu"));
    }
}
