use rigger_core::{
    constants::{SOPS_AGE_KEY_FILE_VAR, SOPS_AGE_KEY_VAR},
    CommandArguments, EnvironmentVariables, Error, Result,
};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Key management backend used by `sops encrypt`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SopsDriver {
    #[default]
    Age,
    AzureKv,
    HcVaultTransit,
    GcpKms,
    AwsKms,
    Pgp,
}

impl SopsDriver {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SopsDriver::Age => "age",
            SopsDriver::AzureKv => "azure-kv",
            SopsDriver::HcVaultTransit => "hc-vault-transit",
            SopsDriver::GcpKms => "gcp-kms",
            SopsDriver::AwsKms => "aws-kms",
            SopsDriver::Pgp => "pgp",
        }
    }

    /// `sops encrypt` flag carrying this driver's key reference
    #[must_use]
    pub fn flag(&self) -> &'static str {
        match self {
            SopsDriver::Age => "--age",
            SopsDriver::AzureKv => "--azure-kv",
            SopsDriver::HcVaultTransit => "--hc-vault-transit",
            SopsDriver::GcpKms => "--gcp-kms",
            SopsDriver::AwsKms => "--kms",
            SopsDriver::Pgp => "--pgp",
        }
    }
}

impl FromStr for SopsDriver {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "age" => Ok(SopsDriver::Age),
            "azure-kv" | "azure" | "azkv" => Ok(SopsDriver::AzureKv),
            "hc-vault-transit" | "vault" => Ok(SopsDriver::HcVaultTransit),
            "gcp-kms" | "gcp" => Ok(SopsDriver::GcpKms),
            "aws-kms" | "aws" | "kms" => Ok(SopsDriver::AwsKms),
            "pgp" => Ok(SopsDriver::Pgp),
            other => Err(Error::validation(format!(
                "unknown sops driver '{other}' (expected age, azure-kv, hc-vault-transit, gcp-kms, aws-kms or pgp)"
            ))),
        }
    }
}

impl fmt::Display for SopsDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// age settings; the private key never leaves the child environment
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AgeParams {
    /// Comma-separated public keys
    pub recipients: Option<String>,
    pub key_file: Option<PathBuf>,
    /// Inline private key
    pub key: Option<String>,
}

impl fmt::Debug for AgeParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgeParams")
            .field("recipients", &self.recipients)
            .field("key_file", &self.key_file)
            .field("key", &self.key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Everything a sops vault needs to run the CLI
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SopsParams {
    /// Absolute path of the encrypted dotenv file
    pub file: PathBuf,
    pub config_file: Option<PathBuf>,
    pub driver: SopsDriver,
    pub age: AgeParams,
    pub kms_arns: Option<String>,
    pub azure_kv_uri: Option<String>,
    pub hc_vault_transit_uri: Option<String>,
    pub gcp_kms_uri: Option<String>,
    pub pgp_fingerprints: Option<String>,
}

impl SopsParams {
    #[must_use]
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            ..Self::default()
        }
    }

    /// Variables the child needs to find the age private key
    #[must_use]
    pub fn credential_env(&self) -> EnvironmentVariables {
        let mut env = EnvironmentVariables::new();
        if self.driver == SopsDriver::Age {
            if let Some(key_file) = &self.age.key_file {
                env.insert(SOPS_AGE_KEY_FILE_VAR, key_file.to_string_lossy());
            } else if let Some(key) = &self.age.key {
                env.insert(SOPS_AGE_KEY_VAR, key.as_str());
            }
        }
        env
    }

    /// `--config <file>` when a config file is set
    #[must_use]
    pub fn config_args(&self) -> CommandArguments {
        let mut args = CommandArguments::new();
        if let Some(config) = &self.config_file {
            args.push_flag("--config", &config.to_string_lossy());
        }
        args
    }

    /// Public key reference for the selected driver, as `sops encrypt` flags
    #[must_use]
    pub fn driver_args(&self) -> CommandArguments {
        let value = match self.driver {
            SopsDriver::Age => self.age.recipients.as_deref(),
            SopsDriver::AzureKv => self.azure_kv_uri.as_deref(),
            SopsDriver::HcVaultTransit => self.hc_vault_transit_uri.as_deref(),
            SopsDriver::GcpKms => self.gcp_kms_uri.as_deref(),
            SopsDriver::AwsKms => self.kms_arns.as_deref(),
            SopsDriver::Pgp => self.pgp_fingerprints.as_deref(),
        };

        let mut args = CommandArguments::new();
        args.push_flag(self.driver.flag(), value.unwrap_or_default());
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_aliases() {
        assert_eq!("azkv".parse::<SopsDriver>().unwrap(), SopsDriver::AzureKv);
        assert_eq!("Vault".parse::<SopsDriver>().unwrap(), SopsDriver::HcVaultTransit);
        assert_eq!("kms".parse::<SopsDriver>().unwrap(), SopsDriver::AwsKms);
        assert_eq!("gcp".parse::<SopsDriver>().unwrap(), SopsDriver::GcpKms);
        assert_eq!("".parse::<SopsDriver>().unwrap(), SopsDriver::Age);

        let err = "rot13".parse::<SopsDriver>().unwrap_err();
        assert_eq!(err.kind(), rigger_core::ErrorKind::Validation);
    }

    #[test]
    fn test_key_file_wins_over_inline_key() {
        let mut params = SopsParams::new("/srv/secrets.env");
        params.age.key = Some("AGE-SECRET-KEY-1XYZ".into());
        assert_eq!(
            params.credential_env().get(SOPS_AGE_KEY_VAR).map(String::as_str),
            Some("AGE-SECRET-KEY-1XYZ")
        );

        params.age.key_file = Some("/srv/keys.txt".into());
        let env = params.credential_env();
        assert_eq!(env.get(SOPS_AGE_KEY_FILE_VAR).map(String::as_str), Some("/srv/keys.txt"));
        assert!(!env.contains(SOPS_AGE_KEY_VAR));
    }

    #[test]
    fn test_driver_args() {
        let mut params = SopsParams::new("/srv/secrets.env");
        assert!(params.driver_args().is_empty());

        params.age.recipients = Some("age1abc".into());
        assert_eq!(params.driver_args().as_slice(), ["--age", "age1abc"]);

        params.driver = SopsDriver::AwsKms;
        params.kms_arns = Some("arn:aws:kms:eu-west-1:1:key/2".into());
        assert_eq!(
            params.driver_args().as_slice(),
            ["--kms", "arn:aws:kms:eu-west-1:1:key/2"]
        );
    }

    #[test]
    fn test_debug_redacts_inline_key() {
        let age = AgeParams {
            key: Some("AGE-SECRET-KEY-1XYZ".into()),
            ..Default::default()
        };
        let rendered = format!("{age:?}");
        assert!(!rendered.contains("AGE-SECRET-KEY"));
        assert!(rendered.contains("<redacted>"));
    }
}
