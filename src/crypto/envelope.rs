//! Text armor for encrypted blobs.
//!
//! One blob is a single line of ASCII:
//!
//! ```text
//! $envseal$v1$<base64 body>
//! ```
//!
//! The base64 body has this layout:
//!
//! ```text
//! [memory_kib: u32 LE][iterations: u32 LE][parallelism: u32 LE][salt: 16][nonce: 12][ciphertext + tag]
//! ```
//!
//! The Argon2 parameters travel with the blob, so an artifact stays
//! readable after `.envseal.toml` changes.  They are checked against a
//! caller-supplied ceiling before any key is derived.  `$` is outside the base64
//! alphabet, which lets several blobs sit back to back in one file
//! without a delimiter and still be split apart by [`blobs`].

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use super::encryption::{self, NONCE_LEN, TAG_LEN};
use super::kdf::{self, Argon2Params, SALT_LEN};
use crate::errors::{EnvSealError, Result};

/// Prefix of every armored blob.
pub const MARKER: &str = "$envseal$v1$";

/// Three little-endian u32 Argon2 parameters.
const PARAMS_LEN: usize = 12;

/// Everything before the ciphertext.
const HEADER_LEN: usize = PARAMS_LEN + SALT_LEN + NONCE_LEN;

/// Encrypt `plaintext` under `passphrase` and return one armored blob.
pub fn encrypt(plaintext: &[u8], passphrase: &[u8], params: &Argon2Params) -> Result<String> {
    let salt = kdf::generate_salt();
    let key = kdf::derive_key(passphrase, &salt, params)?;
    let (nonce, ciphertext) = encryption::seal(&key[..], plaintext)?;

    let mut body = Vec::with_capacity(HEADER_LEN + ciphertext.len());
    body.extend_from_slice(&params.memory_kib.to_le_bytes());
    body.extend_from_slice(&params.iterations.to_le_bytes());
    body.extend_from_slice(&params.parallelism.to_le_bytes());
    body.extend_from_slice(&salt);
    body.extend_from_slice(&nonce);
    body.extend_from_slice(&ciphertext);

    Ok(format!("{MARKER}{}", BASE64.encode(body)))
}

/// Decrypt one armored blob whose costs do not exceed the defaults.
pub fn decrypt(armored: &str, passphrase: &[u8]) -> Result<Vec<u8>> {
    decrypt_within(armored, passphrase, &Argon2Params::default())
}

/// Decrypt one armored blob, refusing Argon2 costs above `limit`.
///
/// Malformed armor, out-of-range parameters, and authentication failures
/// all surface as `DecryptionFailed`; no bytes are returned unless the
/// GCM tag verifies.
pub fn decrypt_within(armored: &str, passphrase: &[u8], limit: &Argon2Params) -> Result<Vec<u8>> {
    let (params, body) = parse(armored, limit)?;

    let salt = &body[PARAMS_LEN..PARAMS_LEN + SALT_LEN];
    let nonce = &body[PARAMS_LEN + SALT_LEN..HEADER_LEN];
    let ciphertext = &body[HEADER_LEN..];

    let key = kdf::derive_key(passphrase, salt, &params)
        .map_err(|_| EnvSealError::DecryptionFailed)?;
    encryption::open(&key[..], nonce, ciphertext)
}

/// Decode the armor and check the header without deriving anything.
fn parse(armored: &str, limit: &Argon2Params) -> Result<(Argon2Params, Vec<u8>)> {
    let encoded = armored
        .trim()
        .strip_prefix(MARKER)
        .ok_or(EnvSealError::DecryptionFailed)?;

    let body = BASE64
        .decode(encoded)
        .map_err(|_| EnvSealError::DecryptionFailed)?;

    if body.len() < HEADER_LEN + TAG_LEN {
        return Err(EnvSealError::DecryptionFailed);
    }

    let params = Argon2Params {
        memory_kib: read_u32(&body[0..4]),
        iterations: read_u32(&body[4..8]),
        parallelism: read_u32(&body[8..12]),
    };
    if params.validate().is_err() || !params.within(limit) {
        return Err(EnvSealError::DecryptionFailed);
    }

    Ok((params, body))
}

/// Split an artifact into its armored blobs, oldest first.
///
/// Text before the first marker is ignored.
pub fn blobs(text: &str) -> Vec<&str> {
    let starts: Vec<usize> = text.match_indices(MARKER).map(|(i, _)| i).collect();

    starts
        .iter()
        .enumerate()
        .map(|(n, &start)| {
            let end = starts.get(n + 1).copied().unwrap_or(text.len());
            text[start..end].trim()
        })
        .collect()
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    u32::from_le_bytes(buf)
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
    fn armored_blob_is_single_ascii_line() {
        let blob = encrypt(b"A=1\nB=2\n", b"topsecret", &fast()).unwrap();
        assert!(blob.starts_with(MARKER));
        assert!(blob.is_ascii());
        assert!(!blob.contains('\n'));
    }

    #[test]
    fn decrypt_tolerates_trailing_newline() {
        let blob = encrypt(b"A=1", b"k", &fast()).unwrap();
        assert_eq!(decrypt(&format!("{blob}\n"), b"k").unwrap(), b"A=1");
    }

    #[test]
    fn decrypt_rejects_missing_marker() {
        assert!(matches!(
            decrypt("U2FsdGVkX1+abc", b"k"),
            Err(EnvSealError::DecryptionFailed)
        ));
    }

    #[test]
    fn decrypt_rejects_bad_base64() {
        let bad = format!("{MARKER}!!!not-base64!!!");
        assert!(matches!(
            decrypt(&bad, b"k"),
            Err(EnvSealError::DecryptionFailed)
        ));
    }

    #[test]
    fn decrypt_rejects_tampered_params() {
        let blob = encrypt(b"A=1", b"k", &fast()).unwrap();
        let mut body = BASE64.decode(&blob[MARKER.len()..]).unwrap();
        body[0..4].copy_from_slice(&u32::MAX.to_le_bytes());
        let tampered = format!("{MARKER}{}", BASE64.encode(body));
        assert!(matches!(
            decrypt(&tampered, b"k"),
            Err(EnvSealError::DecryptionFailed)
        ));
    }

    fn with_params(blob: &str, memory_kib: u32, iterations: u32) -> String {
        let mut body = BASE64.decode(&blob[MARKER.len()..]).unwrap();
        body[0..4].copy_from_slice(&memory_kib.to_le_bytes());
        body[4..8].copy_from_slice(&iterations.to_le_bytes());
        format!("{MARKER}{}", BASE64.encode(body))
    }

    #[test]
    fn costly_header_rejected_before_derivation() {
        let blob = encrypt(b"A=1", b"k", &fast()).unwrap();
        // Inside the hard caps, far above the ceiling.
        let costly = with_params(&blob, 1024 * 1024, 16);

        assert!(matches!(
            parse(&costly, &Argon2Params::default()),
            Err(EnvSealError::DecryptionFailed)
        ));
        assert!(matches!(
            decrypt(&costly, b"k"),
            Err(EnvSealError::DecryptionFailed)
        ));
    }

    #[test]
    fn raised_ceiling_admits_costlier_blob() {
        let params = Argon2Params {
            memory_kib: 8_192,
            iterations: 5,
            parallelism: 1,
        };
        let blob = encrypt(b"A=1", b"k", &params).unwrap();
        let limit = Argon2Params::default().max_with(params);

        assert!(parse(&blob, &fast()).is_err());
        assert_eq!(decrypt_within(&blob, b"k", &limit).unwrap(), b"A=1");
    }

    #[test]
    fn decrypt_rejects_concatenated_blobs() {
        let a = encrypt(b"A=1", b"k", &fast()).unwrap();
        let b = encrypt(b"B=2", b"k", &fast()).unwrap();
        assert!(decrypt(&format!("{a}{b}"), b"k").is_err());
    }

    #[test]
    fn blobs_splits_back_to_back_blobs() {
        let a = encrypt(b"A=1", b"k", &fast()).unwrap();
        let b = encrypt(b"B=2", b"k", &fast()).unwrap();
        let joined = format!("{a}{b}\n");

        let parts = blobs(&joined);
        assert_eq!(parts, vec![a.as_str(), b.as_str()]);
        assert_eq!(decrypt(parts[1], b"k").unwrap(), b"B=2");
    }

    #[test]
    fn blobs_of_text_without_marker_is_empty() {
        assert!(blobs("").is_empty());
        assert!(blobs("garbage").is_empty());
    }
}
