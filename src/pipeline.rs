//! The encrypt / decrypt-to-file / decrypt-to-process flows.
//!
//! `Pipeline` wires the resolver, key provider, cipher, store and applier
//! together for one project root.  The decrypt paths record their
//! progress in a [`PipelineState`]:
//!
//! ```text
//! Idle → Resolved → KeyLoaded → Read → Decrypted → Applied
//!   └──────────── any failure ──────────────→ Failed(kind)
//! ```

use std::path::{Path, PathBuf};

use zeroize::{Zeroize, Zeroizing};

use crate::config::Settings;
use crate::crypto;
use crate::env::{self, DeploymentMode, EncryptionKey, EnvSink};
use crate::errors::{EnvSealError, ErrorKind, Result};
use crate::store::{self, WriteMode};

/// Progress of the most recent decrypt run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Resolved,
    KeyLoaded,
    Read,
    Decrypted,
    Applied,
    Failed(ErrorKind),
}

/// Outcome of [`Pipeline::encrypt`].
#[derive(Debug, Clone)]
pub struct EncryptReport {
    /// Plaintext file the secrets were read from.
    pub source: PathBuf,
    /// Encrypted artifact that was written.
    pub artifact: PathBuf,
    /// Number of variables sealed (excluding `ENCRYPTION_KEY`).
    pub keys: usize,
    pub write_mode: WriteMode,
}

/// Outcome of [`Pipeline::decrypt_to_file`].
#[derive(Debug, Clone)]
pub struct DecryptReport {
    pub source: PathBuf,
    pub artifact: PathBuf,
    /// Plaintext artifact that was written.
    pub output: PathBuf,
    pub keys: usize,
}

/// Outcome of [`Pipeline::configure`].
#[derive(Debug, Clone)]
pub struct ConfigReport {
    pub source: PathBuf,
    pub artifact: PathBuf,
    /// Number of pairs handed to the sink.
    pub applied: usize,
}

/// A decrypted artifact held in memory.
pub struct Decrypted {
    pub source: PathBuf,
    pub artifact: PathBuf,
    /// The plaintext payload, wiped on drop.
    pub payload: Zeroizing<String>,
}

/// The encrypt/decrypt pipeline for one project root.
pub struct Pipeline {
    root: PathBuf,
    mode: DeploymentMode,
    settings: Settings,
    state: PipelineState,
}

impl Pipeline {
    pub fn new(root: impl Into<PathBuf>, mode: DeploymentMode, settings: Settings) -> Self {
        Self {
            root: root.into(),
            mode,
            settings,
            state: PipelineState::Idle,
        }
    }

    /// Build a pipeline from the current directory, its `.envseal.toml`,
    /// and the configured mode variable.
    pub fn from_env() -> Result<Self> {
        let root = std::env::current_dir()?;
        let settings = Settings::load(&root)?;
        let mode = settings.mode_from_env();
        Ok(Self::new(root, mode, settings))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn mode(&self) -> DeploymentMode {
        self.mode
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    fn resolve_source(&self) -> Result<PathBuf> {
        env::resolve(&self.root, self.mode, self.settings.candidates(self.mode))
    }

    /// Record the outcome of one step.
    fn step<T>(&mut self, next: PipelineState, result: Result<T>) -> Result<T> {
        match result {
            Ok(value) => {
                self.state = next;
                Ok(value)
            }
            Err(e) => {
                self.state = PipelineState::Failed(e.kind());
                Err(e)
            }
        }
    }

    /// Seal the resolved plaintext file into the encrypted artifact.
    ///
    /// The `ENCRYPTION_KEY` line is stripped before encryption.  A
    /// missing key is reported before the artifact is touched.
    pub fn encrypt(&mut self, write_mode: WriteMode) -> Result<EncryptReport> {
        let source = self.resolve_source()?;
        let plain = env::load_environment(&source)?;
        let key = plain.key()?;

        let payload = plain.payload();
        let keys = env::parse_payload(&payload).len();
        let blob = crypto::encrypt(payload.as_bytes(), key.as_bytes(), &self.settings.argon2_params())?;

        let artifact = self.settings.encrypted_path(&self.root);
        store::write(&artifact, &blob, write_mode)?;

        Ok(EncryptReport {
            source,
            artifact,
            keys,
            write_mode,
        })
    }

    /// Decrypt the artifact into memory.
    ///
    /// When the artifact holds several appended blobs the most recent
    /// one is authoritative.
    pub fn decrypt(&mut self) -> Result<Decrypted> {
        self.state = PipelineState::Idle;

        let source = self.resolve_source();
        let source = self.step(PipelineState::Resolved, source)?;

        let key = env::load_key(&source);
        let key = self.step(PipelineState::KeyLoaded, key)?;

        let artifact = self.settings.encrypted_path(&self.root);
        let text = store::read(&artifact);
        let text = self.step(PipelineState::Read, text)?;

        let payload = decrypt_latest(&text, &key, &self.settings.argon2_limit());
        let payload = self.step(PipelineState::Decrypted, payload)?;

        Ok(Decrypted {
            source,
            artifact,
            payload,
        })
    }

    /// Decrypt the artifact and write the plaintext artifact.
    pub fn decrypt_to_file(&mut self, write_mode: WriteMode) -> Result<DecryptReport> {
        let decrypted = self.decrypt()?;
        let output = self.settings.decrypted_path(&self.root);
        store::write(&output, &decrypted.payload, write_mode)?;

        Ok(DecryptReport {
            keys: env::parse_payload(&decrypted.payload).len(),
            source: decrypted.source,
            artifact: decrypted.artifact,
            output,
        })
    }

    /// Decrypt the artifact and apply its pairs to `sink`.
    ///
    /// Nothing reaches the sink unless decryption fully succeeded.
    pub fn configure(&mut self, sink: &mut dyn EnvSink) -> Result<ConfigReport> {
        let decrypted = self.decrypt()?;
        let applied = env::apply(&decrypted.payload, sink);
        self.state = PipelineState::Applied;

        Ok(ConfigReport {
            source: decrypted.source,
            artifact: decrypted.artifact,
            applied,
        })
    }
}

/// Decrypt the newest blob in `text` and require UTF-8.
fn decrypt_latest(
    text: &str,
    key: &EncryptionKey,
    limit: &crypto::Argon2Params,
) -> Result<Zeroizing<String>> {
    let blob = crypto::blobs(text)
        .pop()
        .ok_or(EnvSealError::DecryptionFailed)?;
    let bytes = crypto::decrypt_within(blob, key.as_bytes(), limit)?;

    String::from_utf8(bytes).map(Zeroizing::new).map_err(|e| {
        let mut bytes = e.into_bytes();
        bytes.zeroize();
        EnvSealError::InvalidPayload("decrypted artifact is not UTF-8".into())
    })
}
