//! Passphrase-based key derivation using Argon2id.
//!
//! `ENCRYPTION_KEY` is an arbitrary-length text secret, not a raw AES key,
//! so every blob derives its 32-byte key from the passphrase and a fresh
//! random salt.  Parameters come from `.envseal.toml` on encrypt and from
//! the blob itself on decrypt.

use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use zeroize::Zeroizing;

use crate::errors::{EnvSealError, Result};

/// Length of the per-blob salt in bytes.
pub const SALT_LEN: usize = 16;

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// Minimum safe memory cost in KiB (8 MB).
const MIN_MEMORY_KIB: u32 = 8_192;

/// Hard upper bound on memory cost (1 GB).
const MAX_MEMORY_KIB: u32 = 1024 * 1024;

/// Hard upper bounds on iterations and lanes.
const MAX_ITERATIONS: u32 = 16;
const MAX_PARALLELISM: u32 = 16;

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Params {
    /// Memory cost in KiB (default: 65 536 = 64 MB).
    pub memory_kib: u32,
    /// Number of iterations (default: 3).
    pub iterations: u32,
    /// Parallelism lanes (default: 4).
    pub parallelism: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            memory_kib: 65_536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

impl Argon2Params {
    /// Reject parameters that are dangerously weak or unreasonably large.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_MEMORY_KIB..=MAX_MEMORY_KIB).contains(&self.memory_kib) {
            return Err(EnvSealError::KeyDerivationFailed(format!(
                "Argon2 memory_kib must be between {MIN_MEMORY_KIB} and {MAX_MEMORY_KIB} (got {})",
                self.memory_kib
            )));
        }
        if !(1..=MAX_ITERATIONS).contains(&self.iterations) {
            return Err(EnvSealError::KeyDerivationFailed(format!(
                "Argon2 iterations must be between 1 and {MAX_ITERATIONS} (got {})",
                self.iterations
            )));
        }
        if !(1..=MAX_PARALLELISM).contains(&self.parallelism) {
            return Err(EnvSealError::KeyDerivationFailed(format!(
                "Argon2 parallelism must be between 1 and {MAX_PARALLELISM} (got {})",
                self.parallelism
            )));
        }
        Ok(())
    }

    /// True when no cost in `self` exceeds the matching cost in `limit`.
    pub fn within(&self, limit: &Argon2Params) -> bool {
        self.memory_kib <= limit.memory_kib
            && self.iterations <= limit.iterations
            && self.parallelism <= limit.parallelism
    }

    /// The larger of each cost in `self` and `other`.
    pub fn max_with(self, other: Argon2Params) -> Self {
        Self {
            memory_kib: self.memory_kib.max(other.memory_kib),
            iterations: self.iterations.max(other.iterations),
            parallelism: self.parallelism.max(other.parallelism),
        }
    }
}

/// Derive a 32-byte key from `passphrase` and `salt`.
///
/// The same passphrase + salt + params always produce the same key.
/// The result is wiped from memory on drop.
pub fn derive_key(
    passphrase: &[u8],
    salt: &[u8],
    argon2_params: &Argon2Params,
) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    argon2_params.validate()?;

    let params = Params::new(
        argon2_params.memory_kib,
        argon2_params.iterations,
        argon2_params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| EnvSealError::KeyDerivationFailed(format!("invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    argon2
        .hash_password_into(passphrase, salt, &mut key[..])
        .map_err(|e| EnvSealError::KeyDerivationFailed(format!("Argon2id hashing failed: {e}")))?;

    Ok(key)
}

/// Generate a random salt for one blob.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> Argon2Params {
        Argon2Params {
            memory_kib: 8_192,
            iterations: 1,
            parallelism: 1,
        }
    }

    #[test]
    fn same_inputs_same_key() {
        let salt = generate_salt();
        let a = derive_key(b"topsecret", &salt, &fast()).unwrap();
        let b = derive_key(b"topsecret", &salt, &fast()).unwrap();
        assert_eq!(*a, *b);
    }

    #[test]
    fn different_salt_different_key() {
        let a = derive_key(b"topsecret", &generate_salt(), &fast()).unwrap();
        let b = derive_key(b"topsecret", &generate_salt(), &fast()).unwrap();
        assert_ne!(*a, *b);
    }

    #[test]
    fn rejects_weak_memory_cost() {
        let weak = Argon2Params {
            memory_kib: 1_024,
            ..fast()
        };
        assert!(derive_key(b"pw", &generate_salt(), &weak).is_err());
    }

    #[test]
    fn rejects_oversized_params() {
        let huge = Argon2Params {
            memory_kib: u32::MAX,
            ..fast()
        };
        assert!(huge.validate().is_err());

        let zero_lanes = Argon2Params {
            parallelism: 0,
            ..fast()
        };
        assert!(zero_lanes.validate().is_err());

        let slow = Argon2Params {
            iterations: 64,
            ..fast()
        };
        assert!(slow.validate().is_err());
    }

    #[test]
    fn within_compares_every_cost() {
        let limit = Argon2Params::default();
        assert!(fast().within(&limit));
        assert!(limit.within(&limit));

        let more_memory = Argon2Params {
            memory_kib: limit.memory_kib * 2,
            ..limit
        };
        assert!(!more_memory.within(&limit));

        let more_lanes = Argon2Params {
            parallelism: limit.parallelism + 1,
            ..fast()
        };
        assert!(!more_lanes.within(&limit));
    }

    #[test]
    fn max_with_takes_larger_cost() {
        let merged = fast().max_with(Argon2Params {
            memory_kib: 8_192,
            iterations: 5,
            parallelism: 1,
        });
        assert_eq!(merged.iterations, 5);
        assert_eq!(merged.memory_kib, 8_192);
    }
}
