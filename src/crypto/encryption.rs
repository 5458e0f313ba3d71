//! AES-256-GCM authenticated encryption.
//!
//! `seal` generates a fresh random 12-byte nonce per call and returns it
//! next to the ciphertext; `open` verifies the 16-byte tag before handing
//! anything back, so a wrong key never yields plaintext.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};

use crate::errors::{EnvSealError, Result};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Encrypt `plaintext` under a 32-byte `key`.
///
/// Returns `(nonce, ciphertext || tag)`.
pub fn seal(key: &[u8], plaintext: &[u8]) -> Result<([u8; NONCE_LEN], Vec<u8>)> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| EnvSealError::EncryptionFailed(format!("invalid key length: {e}")))?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| EnvSealError::EncryptionFailed(format!("encryption error: {e}")))?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    nonce_bytes.copy_from_slice(&nonce);
    Ok((nonce_bytes, ciphertext))
}

/// Decrypt and authenticate `ciphertext` (which carries its tag).
///
/// Every failure, including a wrong key, maps to `DecryptionFailed`.
pub fn open(key: &[u8], nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    if nonce.len() != NONCE_LEN || ciphertext.len() < TAG_LEN {
        return Err(EnvSealError::DecryptionFailed);
    }

    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| EnvSealError::DecryptionFailed)?;

    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| EnvSealError::DecryptionFailed)
}
