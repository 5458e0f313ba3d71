//! envseal: keep `.env` secrets encrypted in source control and decrypt
//! them just-in-time.
//!
//! The passphrase lives in the project's plaintext env file as
//! `ENCRYPTION_KEY`.  The three entry points below mirror the CLI and
//! operate on the current directory:
//!
//! - [`encrypt_secrets`] seals the plaintext file into `.env.encrypted`.
//! - [`decrypt_secrets`] writes the decrypted payload to `.env.decrypted`.
//! - [`config_secrets`] decrypts into the process environment.
//!
//! Hosts that want configuration without touching process-global state
//! should build a [`Pipeline`] and call [`Pipeline::configure`] with a
//! [`ConfigContext`].

#[cfg(feature = "audit-log")]
pub mod audit;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod env;
pub mod errors;
pub mod pipeline;
pub mod store;

pub use env::{ConfigContext, DeploymentMode, EnvSink, ProcessEnv};
pub use errors::{EnvSealError, ErrorKind, Result};
pub use pipeline::{Pipeline, PipelineState};
pub use store::WriteMode;

/// Encrypt the resolved plaintext env file into the encrypted artifact.
pub fn encrypt_secrets() -> Result<()> {
    let mut pipeline = Pipeline::from_env()?;
    let mode = pipeline.settings().write_mode;
    pipeline.encrypt(mode).map(|_| ())
}

/// Decrypt the encrypted artifact into the decrypted artifact.
pub fn decrypt_secrets() -> Result<()> {
    let mut pipeline = Pipeline::from_env()?;
    let mode = pipeline.settings().write_mode;
    pipeline.decrypt_to_file(mode).map(|_| ())
}

/// Decrypt the encrypted artifact into the process environment.
///
/// Any error here should be treated as a fatal startup failure.
pub fn config_secrets() -> Result<()> {
    let mut pipeline = Pipeline::from_env()?;
    pipeline.configure(&mut ProcessEnv).map(|_| ())
}
