//! Apply a decrypted payload to configuration state.
//!
//! The target is abstracted behind [`EnvSink`].  Application startup
//! normally collects into a [`ConfigContext`] and passes that around;
//! [`ProcessEnv`] exists for hosts that really do want the values in the
//! process-wide environment.

use std::collections::BTreeMap;

use super::parser::parse_env_line;

/// Somewhere decrypted key/value pairs can be written.
pub trait EnvSink {
    fn set(&mut self, key: &str, value: &str);
}

/// An explicit, in-memory configuration map.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigContext {
    vars: BTreeMap<String, String>,
}

impl ConfigContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Iterate in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }
}

impl EnvSink for ConfigContext {
    fn set(&mut self, key: &str, value: &str) {
        self.vars.insert(key.to_string(), value.to_string());
    }
}

/// The real process environment.
///
/// Process-global: concurrent writers elsewhere in the host can race
/// with this, and coordinating them is the host's job.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvSink for ProcessEnv {
    fn set(&mut self, key: &str, value: &str) {
        std::env::set_var(key, value);
    }
}

/// Parse a decrypted payload into the pairs that would be applied.
///
/// Each line is split on its first `=` only.  A pair is kept when both
/// key and value are non-empty; anything else (no `=`, empty side,
/// comment, embedded NUL) is skipped and parsing moves to the next line.
pub fn parse_payload(payload: &str) -> Vec<(String, String)> {
    payload
        .lines()
        .filter_map(parse_env_line)
        .filter(|(k, v)| !v.is_empty() && !k.contains('\0') && !v.contains('\0'))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Apply `payload` to `sink` and return how many pairs were set.
pub fn apply(payload: &str, sink: &mut dyn EnvSink) -> usize {
    let pairs = parse_payload(payload);
    for (key, value) in &pairs {
        sink.set(key, value);
    }
    pairs.len()
}
