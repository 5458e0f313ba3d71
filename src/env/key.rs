//! Load `ENCRYPTION_KEY` from the resolved plaintext env file.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use zeroize::Zeroizing;

use super::parser::{parse_env_str, strip_key};
use crate::errors::{EnvSealError, Result};

/// Name of the variable that carries the passphrase.
pub const KEY_VAR: &str = "ENCRYPTION_KEY";

/// The passphrase used to encrypt and decrypt artifacts.
///
/// Never empty. Wiped from memory on drop and redacted in `Debug`.
pub struct EncryptionKey(Zeroizing<String>);

impl EncryptionKey {
    /// Wrap a passphrase. Returns `None` for an empty string.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = Zeroizing::new(value.into());
        if value.is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncryptionKey(<redacted>)")
    }
}

/// The parsed contents of the resolved plaintext env file.
pub struct PlaintextEnvironment {
    path: PathBuf,
    raw: Zeroizing<String>,
    vars: HashMap<String, String>,
}

impl PlaintextEnvironment {
    /// Path of the file this was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All parsed variables, including `ENCRYPTION_KEY`.
    pub fn vars(&self) -> &HashMap<String, String> {
        &self.vars
    }

    /// Extract the encryption key, failing if it is absent or empty.
    pub fn key(&self) -> Result<EncryptionKey> {
        self.vars
            .get(KEY_VAR)
            .and_then(|v| EncryptionKey::new(v.as_str()))
            .ok_or_else(|| EnvSealError::MissingKey(self.path.clone()))
    }

    /// The file's text with every `ENCRYPTION_KEY` line removed.
    ///
    /// This is what gets encrypted, so the key never ends up inside
    /// the artifact it protects.
    pub fn payload(&self) -> Zeroizing<String> {
        Zeroizing::new(strip_key(&self.raw, KEY_VAR))
    }
}

/// Read and parse the plaintext env file at `path`.
pub fn load_environment(path: &Path) -> Result<PlaintextEnvironment> {
    let raw = Zeroizing::new(fs::read_to_string(path)?);
    let vars = parse_env_str(&raw);
    Ok(PlaintextEnvironment {
        path: path.to_path_buf(),
        raw,
        vars,
    })
}

/// Load just the encryption key from `path`.
pub fn load_key(path: &Path) -> Result<EncryptionKey> {
    load_environment(path)?.key()
}
