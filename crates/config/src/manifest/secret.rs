use crate::de::{parse_flag, parse_int};
use rigger_core::constants::{DEFAULT_SECRET_SIZE, DEFAULT_SECRET_SPECIAL};
use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::fmt;

/// A secret declared by a manifest
///
/// In YAML a secret is either a bare name or a mapping:
///
/// ```yaml
/// secrets:
///   - API_TOKEN
///   - name: DB_PASS
///     vault: main
///     gen: true
///     size: 24
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Secret {
    pub name: String,
    /// Storage key inside the vault; the name is used when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Vault to read from and persist into; unset searches every vault
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vault: Option<String>,
    /// Generate and persist a value when none is stored
    pub gen: bool,
    pub upper: bool,
    pub lower: bool,
    pub digits: bool,
    pub special: String,
    /// Signed so that invalid sizes survive parsing and fail at generation
    pub size: i64,
}

impl Default for Secret {
    fn default() -> Self {
        Self {
            name: String::new(),
            key: None,
            vault: None,
            gen: false,
            upper: true,
            lower: true,
            digits: true,
            special: DEFAULT_SECRET_SPECIAL.to_string(),
            size: DEFAULT_SECRET_SIZE,
        }
    }
}

impl Secret {
    /// A secret with every option at its default
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// The key used to look the secret up in a vault
    #[must_use]
    pub fn storage_key(&self) -> &str {
        match self.key.as_deref() {
            Some(key) if !key.is_empty() => key,
            _ => &self.name,
        }
    }

    /// The designated vault, if any
    #[must_use]
    pub fn vault_name(&self) -> Option<&str> {
        self.vault.as_deref().filter(|v| !v.is_empty())
    }
}

impl<'de> Deserialize<'de> for Secret {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(SecretVisitor)
    }
}

struct SecretVisitor;

impl<'de> Visitor<'de> for SecretVisitor {
    type Value = Secret;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a secret name or a secret mapping")
    }

    fn visit_str<E: de::Error>(self, name: &str) -> Result<Secret, E> {
        Ok(Secret::new(name))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Secret, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut secret = Secret::default();
        let mut has_name = false;

        while let Some(field) = map.next_key::<String>()? {
            match field.as_str() {
                "name" => {
                    secret.name = map.next_value()?;
                    has_name = true;
                }
                "key" => secret.key = map.next_value()?,
                "vault" => secret.vault = map.next_value()?,
                "special" => {
                    secret.special = map.next_value::<Option<String>>()?.unwrap_or_default();
                }
                "gen" | "generate" => secret.gen = next_flag(&field, &mut map)?,
                "upper" => secret.upper = next_flag(&field, &mut map)?,
                "lower" => secret.lower = next_flag(&field, &mut map)?,
                "digits" => secret.digits = next_flag(&field, &mut map)?,
                "size" => {
                    let value: Value = map.next_value()?;
                    secret.size = match parse_int(&value) {
                        Some(size) => size,
                        None => {
                            return Err(de::Error::invalid_value(
                                de::Unexpected::Other("non-numeric size"),
                                &"an integer",
                            ))
                        }
                    };
                }
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }

        if !has_name {
            return Err(de::Error::missing_field("name"));
        }
        Ok(secret)
    }
}

fn next_flag<'de, A: MapAccess<'de>>(field: &str, map: &mut A) -> Result<bool, A::Error> {
    let value: Value = map.next_value()?;
    parse_flag(&value).ok_or_else(|| {
        de::Error::custom(format!(
            "invalid value for '{field}': expected true, false, 1 or 0"
        ))
    })
}
