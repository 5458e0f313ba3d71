//! Cryptographic primitives for envseal.
//!
//! This module provides:
//! - AES-256-GCM authenticated encryption (`encryption`)
//! - Argon2id passphrase-based key derivation (`kdf`)
//! - The text armor that turns both into artifact-safe blobs (`envelope`)

pub mod encryption;
pub mod envelope;
pub mod kdf;

pub use envelope::{blobs, decrypt, decrypt_within, encrypt, MARKER};
pub use kdf::Argon2Params;
