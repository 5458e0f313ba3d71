//! Plaintext `.env` parsing.
//!
//! Shared by the key provider (reading the plaintext source) and the
//! applier (reading decrypted payloads), so both sides agree on what a
//! line means.

use std::collections::HashMap;

/// Parse a single `.env` line into a (key, value) pair.
///
/// Returns `None` for blank lines, comments, and lines without `=`.
/// Handles an `export` prefix, one pair of matching quotes, and `=`
/// inside values.
pub fn parse_env_line(line: &str) -> Option<(&str, &str)> {
    let trimmed = line.trim();

    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);

    let (key, value) = trimmed.split_once('=')?;
    let key = key.trim();
    let value = unquote(value.trim());

    if key.is_empty() {
        return None;
    }

    Some((key, value))
}

fn unquote(value: &str) -> &str {
    ['"', '\'']
        .iter()
        .find_map(|&q| value.strip_prefix(q).and_then(|v| v.strip_suffix(q)))
        .unwrap_or(value)
}

/// Parse `.env` content into a key-value map. Later lines win.
pub fn parse_env_str(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .filter_map(parse_env_line)
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Return `content` without any line that assigns `key`.
///
/// Every other line, including comments and blanks, is kept verbatim.
pub fn strip_key(content: &str, key: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for line in content.split_inclusive('\n') {
        if parse_env_line(line).is_some_and(|(k, _)| k == key) {
            continue;
        }
        out.push_str(line);
    }
    out
}
