//! Random secret generation

use rand::{rngs::OsRng, Rng};
use rigger_config::Secret;
use rigger_core::{Error, Result, DIGIT_CHARS, LOWER_CHARS, MAX_SECRET_SIZE, UPPER_CHARS};

/// Characters a generated value for `secret` is drawn from.
///
/// Classes are concatenated in a fixed order: digits, lowercase, uppercase,
/// then the secret's `special` literal.
#[must_use]
pub fn charset(secret: &Secret) -> Vec<char> {
    let mut chars = String::new();
    if secret.digits {
        chars.push_str(DIGIT_CHARS);
    }
    if secret.lower {
        chars.push_str(LOWER_CHARS);
    }
    if secret.upper {
        chars.push_str(UPPER_CHARS);
    }
    chars.push_str(&secret.special);
    chars.chars().collect()
}

/// Generate a value for `secret` from the OS random source.
///
/// Each character is sampled independently and uniformly from [`charset`].
/// Sizes outside `1..=MAX_SECRET_SIZE` are rejected.
pub fn generate_secret(secret: &Secret) -> Result<String> {
    if secret.size <= 0 {
        return Err(Error::validation(format!(
            "secret '{}' has invalid size {}",
            secret.name, secret.size
        )));
    }
    if secret.size > MAX_SECRET_SIZE {
        return Err(Error::validation(format!(
            "secret '{}' size {} exceeds the maximum of {MAX_SECRET_SIZE}",
            secret.name, secret.size
        )));
    }

    let chars = charset(secret);
    if chars.is_empty() {
        return Err(Error::validation(format!(
            "secret '{}' has an empty character set",
            secret.name
        )));
    }

    let mut rng = OsRng;
    let value = (0..secret.size)
        .map(|_| chars[rng.gen_range(0..chars.len())])
        .collect();
    Ok(value)
}
