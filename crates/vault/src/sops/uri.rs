//! Building [`SopsParams`] from a vault declaration
//!
//! Precedence for every parameter: URI query, then the `with` block, then
//! (for age recipients and key file only) the process environment.

use super::params::{SopsDriver, SopsParams};
use rigger_config::Vault;
use rigger_core::{
    constants::{SOPS_AGE_KEY_FILE_VAR, SOPS_AGE_RECIPIENTS_VAR},
    EnvironmentVariables, Error, Result,
};
use rigger_utils::paths::resolve_path;
use percent_encoding::percent_decode_str;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use url::Url;

struct Lookup<'a> {
    vault: &'a Vault,
    query: HashMap<String, String>,
    env: &'a EnvironmentVariables,
}

impl Lookup<'_> {
    fn query_or_with(&self, name: &str) -> Option<String> {
        self.query
            .get(name)
            .filter(|v| !v.is_empty())
            .cloned()
            .or_else(|| self.vault.param(name))
    }

    fn with_env_fallback(&self, name: &str, env_var: &str) -> Option<String> {
        self.query_or_with(name).or_else(|| {
            self.env
                .get(env_var)
                .filter(|v| !v.is_empty())
                .cloned()
        })
    }
}

impl SopsParams {
    /// Derive parameters from a declaration found in a manifest at `base_dir`.
    ///
    /// A vault carrying its own `base_dir` resolves against that instead.
    pub fn from_vault(
        vault: &Vault,
        base_dir: &Path,
        env: &EnvironmentVariables,
    ) -> Result<Self> {
        let base_dir = vault.base_dir.as_deref().unwrap_or(base_dir);
        let url = Url::parse(&vault.uri).map_err(|e| {
            Error::validation(format!("vault '{}' has an invalid uri '{}': {e}", vault.name, vault.uri))
        })?;

        let lookup = Lookup {
            vault,
            query: url.query_pairs().into_owned().collect(),
            env,
        };

        let file = match uri_file(&url, &vault.name)? {
            Some(file) => file,
            None => lookup.vault.param("file").map(PathBuf::from).ok_or_else(|| {
                Error::validation(format!(
                    "vault '{}' names no file: use sops://<path> or with.file",
                    vault.name
                ))
            })?,
        };

        let driver = match lookup.query_or_with("driver") {
            Some(name) => name.parse::<SopsDriver>()?,
            None => SopsDriver::Age,
        };

        let mut params = SopsParams::new(resolve_path(file, base_dir));
        params.driver = driver;
        params.config_file = lookup
            .query_or_with("config")
            .map(|config| resolve_path(config, base_dir));
        params.age.recipients = lookup.with_env_fallback("age-recipients", SOPS_AGE_RECIPIENTS_VAR);
        params.age.key_file = lookup
            .with_env_fallback("age-key-file", SOPS_AGE_KEY_FILE_VAR)
            .map(|key_file| resolve_path(key_file, base_dir));
        // Inline private keys are only taken from the manifest body, never a URI
        params.age.key = vault.param("age-key");
        params.kms_arns = lookup.query_or_with("kms");
        params.azure_kv_uri = lookup.query_or_with("azure-kv");
        params.hc_vault_transit_uri = lookup.query_or_with("hc-vault-transit");
        params.gcp_kms_uri = lookup.query_or_with("gcp-kms");
        params.pgp_fingerprints = lookup.query_or_with("pgp");

        Ok(params)
    }
}

/// The file named by the host and path of a sops URI.
///
/// `sops://./a.env` and `sops://../a.env` are relative, `sops:///a.env` is
/// absolute and `sops://dir/a.env` is relative to the manifest directory.
/// Percent-escapes are decoded.
fn uri_file(url: &Url, vault: &str) -> Result<Option<PathBuf>> {
    let host = url.host_str().unwrap_or_default();
    let path = url.path();

    let joined = if host.is_empty() {
        path.to_string()
    } else {
        format!("{host}{path}")
    };

    if joined.is_empty() || joined == "/" {
        return Ok(None);
    }

    let decoded = percent_decode_str(&joined).decode_utf8().map_err(|e| {
        Error::validation(format!("vault '{vault}' has a non UTF-8 path '{joined}': {e}"))
    })?;
    Ok(Some(PathBuf::from(decoded.as_ref())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(uri: &str) -> SopsParams {
        let vault = Vault::new("main", uri);
        SopsParams::from_vault(&vault, Path::new("/srv/app"), &EnvironmentVariables::new()).unwrap()
    }

    #[test]
    fn test_uri_paths() {
        assert_eq!(params("sops://./secrets.env").file, PathBuf::from("/srv/app/secrets.env"));
        assert_eq!(params("sops://../shared.env").file, PathBuf::from("/srv/shared.env"));
        assert_eq!(params("sops:///etc/rigger/prod.env").file, PathBuf::from("/etc/rigger/prod.env"));
        assert_eq!(params("sops://secrets.env").file, PathBuf::from("/srv/app/secrets.env"));
        assert_eq!(params("sops://vaults/prod.env").file, PathBuf::from("/srv/app/vaults/prod.env"));
    }

    #[test]
    fn test_uri_paths_are_percent_decoded() {
        assert_eq!(
            params("sops://./my%20secrets.env").file,
            PathBuf::from("/srv/app/my secrets.env")
        );
        assert_eq!(
            params("sops:///etc/rigger/%C3%A9t%C3%A9.env").file,
            PathBuf::from("/etc/rigger/été.env")
        );

        let vault = Vault::new("main", "sops:///etc/%FF.env");
        let err = SopsParams::from_vault(&vault, Path::new("/srv"), &EnvironmentVariables::new())
            .unwrap_err();
        assert!(err.to_string().contains("main"));
    }

    #[test]
    fn test_query_beats_with_beats_env() {
        let mut env = EnvironmentVariables::new();
        env.insert(SOPS_AGE_RECIPIENTS_VAR, "age1env");
        env.insert(SOPS_AGE_KEY_FILE_VAR, "/home/ops/keys.txt");

        let vault = Vault::new("main", "sops://./s.env?age-recipients=age1query")
            .with_param("age-recipients", "age1with")
            .with_param("config", "conf/.sops.yaml");
        let params = SopsParams::from_vault(&vault, Path::new("/srv/app"), &env).unwrap();
        assert_eq!(params.age.recipients.as_deref(), Some("age1query"));
        assert_eq!(params.config_file, Some(PathBuf::from("/srv/app/conf/.sops.yaml")));
        assert_eq!(params.age.key_file, Some(PathBuf::from("/home/ops/keys.txt")));

        let vault = Vault::new("main", "sops://./s.env").with_param("age-recipients", "age1with");
        let params = SopsParams::from_vault(&vault, Path::new("/srv/app"), &env).unwrap();
        assert_eq!(params.age.recipients.as_deref(), Some("age1with"));

        let vault = Vault::new("main", "sops://./s.env");
        let params = SopsParams::from_vault(&vault, Path::new("/srv/app"), &env).unwrap();
        assert_eq!(params.age.recipients.as_deref(), Some("age1env"));
    }

    #[test]
    fn test_inline_key_only_from_with() {
        let vault = Vault::new("main", "sops://./s.env?age-key=AGE-SECRET-KEY-1QUERY");
        let params = SopsParams::from_vault(&vault, Path::new("/srv"), &EnvironmentVariables::new()).unwrap();
        assert_eq!(params.age.key, None);

        let vault = vault.with_param("age-key", "AGE-SECRET-KEY-1WITH");
        let params = SopsParams::from_vault(&vault, Path::new("/srv"), &EnvironmentVariables::new()).unwrap();
        assert_eq!(params.age.key.as_deref(), Some("AGE-SECRET-KEY-1WITH"));
    }

    #[test]
    fn test_file_from_with_when_uri_has_no_path() {
        let vault = Vault::new("main", "sops://").with_param("file", "./fallback.env");
        let params = SopsParams::from_vault(&vault, Path::new("/srv"), &EnvironmentVariables::new()).unwrap();
        assert_eq!(params.file, PathBuf::from("/srv/fallback.env"));

        let vault = Vault::new("main", "sops://");
        let err = SopsParams::from_vault(&vault, Path::new("/srv"), &EnvironmentVariables::new()).unwrap_err();
        assert!(err.to_string().contains("main"));
    }

    #[test]
    fn test_vault_base_dir_overrides_manifest_dir() {
        let mut vault = Vault::new("shared", "sops://./shared.env?config=.sops.yaml");
        vault.base_dir = Some(PathBuf::from("/srv/platform"));
        let params = SopsParams::from_vault(&vault, Path::new("/srv/platform/api"), &EnvironmentVariables::new()).unwrap();
        assert_eq!(params.file, PathBuf::from("/srv/platform/shared.env"));
        assert_eq!(params.config_file, Some(PathBuf::from("/srv/platform/.sops.yaml")));
    }

    #[test]
    fn test_driver_selection() {
        let vault = Vault::new("main", "sops://./s.env?driver=gcp&gcp-kms=projects/p/keys/k");
        let params = SopsParams::from_vault(&vault, Path::new("/srv"), &EnvironmentVariables::new()).unwrap();
        assert_eq!(params.driver, SopsDriver::GcpKms);
        assert_eq!(params.driver_args().as_slice(), ["--gcp-kms", "projects/p/keys/k"]);

        let vault = Vault::new("main", "sops://./s.env").with_param("driver", "enigma");
        assert!(SopsParams::from_vault(&vault, Path::new("/srv"), &EnvironmentVariables::new()).is_err());
    }
}
