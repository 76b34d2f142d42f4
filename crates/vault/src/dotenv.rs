//! Flat `KEY=value` text, the plaintext form of a dotenv vault

use indexmap::IndexMap;

/// Parse dotenv text. Later duplicates win.
pub fn parse(text: &str) -> Result<IndexMap<String, String>, dotenvy::Error> {
    let mut values = IndexMap::new();
    for entry in dotenvy::from_read_iter(text.as_bytes()) {
        let (key, value) = entry?;
        values.insert(key, value);
    }
    Ok(values)
}

/// Render values as `KEY="value"` lines that [`parse`] reads back exactly
#[must_use]
pub fn serialize(values: &IndexMap<String, String>) -> String {
    let mut out = String::new();
    for (key, value) in values {
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape(value));
        out.push_str("\"\n");
    }
    out
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '$' => escaped.push_str("\\$"),
            '\n' => escaped.push_str("\\n"),
            other => escaped.push(other),
        }
    }
    escaped
}
