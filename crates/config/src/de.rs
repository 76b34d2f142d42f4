//! Lenient scalar handling shared by the manifest types

use indexmap::IndexMap;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_yaml::Value;

/// Render a YAML scalar as a string. Sequences of scalars are joined with
/// commas; mappings and nulls have no string form.
pub(crate) fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Sequence(items) => {
            let parts: Option<Vec<String>> = items.iter().map(render_scalar).collect();
            parts.map(|parts| parts.join(","))
        }
        Value::Tagged(tagged) => render_scalar(&tagged.value),
        Value::Null | Value::Mapping(_) => None,
    }
}

/// Interpret `true/false/1/0` (any case) as a boolean
pub(crate) fn parse_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(s) => {
            let s = s.trim();
            if s.eq_ignore_ascii_case("true") || s == "1" {
                Some(true)
            } else if s.eq_ignore_ascii_case("false") || s == "0" {
                Some(false)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Interpret an integer or numeric string
pub(crate) fn parse_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Deserialize a name→value map whose values may be any YAML scalar
pub(crate) fn string_map<'de, D>(deserializer: D) -> Result<IndexMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<IndexMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
    raw.into_iter()
        .map(|(key, value)| {
            let rendered = match &value {
                Value::Null => String::new(),
                other => render_scalar(other).ok_or_else(|| {
                    <D::Error as de::Error>::custom(format!("value of '{key}' must be a scalar"))
                })?,
            };
            Ok((key, rendered))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(source: &str) -> Value {
        serde_yaml::from_str(source).unwrap()
    }

    #[test]
    fn test_parse_flag_forms() {
        assert_eq!(parse_flag(&yaml("true")), Some(true));
        assert_eq!(parse_flag(&yaml("0")), Some(false));
        assert_eq!(parse_flag(&yaml("'TRUE'")), Some(true));
        assert_eq!(parse_flag(&yaml("'False'")), Some(false));
        assert_eq!(parse_flag(&yaml("'1'")), Some(true));
        assert_eq!(parse_flag(&yaml("yes-please")), None);
        assert_eq!(parse_flag(&yaml("2")), None);
    }

    #[test]
    fn test_render_scalar() {
        assert_eq!(render_scalar(&yaml("8080")), Some("8080".to_string()));
        assert_eq!(render_scalar(&yaml("[a, b]")), Some("a,b".to_string()));
        assert_eq!(render_scalar(&yaml("{a: 1}")), None);
    }
}
