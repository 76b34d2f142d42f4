/// Canonical form of a key stored in a dotenv vault.
///
/// Separators (`_ - . / :`) become `_`, ASCII letters are upper-cased,
/// digits are kept and anything else is dropped, so `db.host`, `DB-HOST`
/// and `DB_HOST` all address the same entry.
#[must_use]
pub fn normalize_key(key: &str) -> String {
    key.chars()
        .filter_map(|c| match c {
            '_' | '-' | '.' | '/' | ':' => Some('_'),
            c if c.is_ascii_alphanumeric() => Some(c.to_ascii_uppercase()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_equivalent_keys_collide() {
        assert_eq!(normalize_key("DB-HOST"), "DB_HOST");
        assert_eq!(normalize_key("db.host"), "DB_HOST");
        assert_eq!(normalize_key("DB_HOST"), "DB_HOST");
    }

    #[test]
    fn test_other_characters_are_dropped() {
        assert_eq!(normalize_key("app/db:pass word!"), "APP_DB_PASSWORD");
        assert_eq!(normalize_key("ключ"), "");
        assert_eq!(normalize_key("v2.token"), "V2_TOKEN");
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(key in "\\PC{0,24}") {
            let once = normalize_key(&key);
            prop_assert_eq!(normalize_key(&once), once.clone());
            prop_assert!(once.chars().all(|c| c == '_' || c.is_ascii_uppercase() || c.is_ascii_digit()));
        }
    }
}
