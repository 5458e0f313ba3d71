use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in envseal.
#[derive(Debug, Error)]
pub enum EnvSealError {
    // --- Resolution / key errors ---
    #[error("No plaintext env file found for {mode} mode (looked for: {})", .candidates.join(", "))]
    Resolution {
        mode: String,
        candidates: Vec<String>,
    },

    #[error("ENCRYPTION_KEY not found or empty in {0}")]
    MissingKey(PathBuf),

    // --- Artifact errors ---
    #[error("Artifact not found at {0}")]
    ArtifactNotFound(PathBuf),

    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed — wrong key or corrupted artifact")]
    DecryptionFailed,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Decrypted payload is not valid: {0}")]
    InvalidPayload(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Child process exited with code {0}")]
    ChildProcessFailed(i32),

    #[error("No command specified — use `envseal run -- <command>`")]
    NoCommandSpecified,

    #[error("Audit error: {0}")]
    AuditError(String),
}

/// Coarse classification of an [`EnvSealError`].
///
/// Carried by `PipelineState::Failed` so callers can see which step
/// aborted a run without holding on to the error itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Resolution,
    MissingKey,
    ArtifactNotFound,
    Decryption,
    Encryption,
    Config,
    Io,
    Other,
}

impl EnvSealError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Resolution { .. } => ErrorKind::Resolution,
            Self::MissingKey(_) => ErrorKind::MissingKey,
            Self::ArtifactNotFound(_) => ErrorKind::ArtifactNotFound,
            Self::DecryptionFailed | Self::InvalidPayload(_) => ErrorKind::Decryption,
            Self::EncryptionFailed(_) | Self::KeyDerivationFailed(_) => ErrorKind::Encryption,
            Self::ConfigError(_) => ErrorKind::Config,
            Self::Io(_) => ErrorKind::Io,
            _ => ErrorKind::Other,
        }
    }
}

/// Convenience type alias for envseal results.
pub type Result<T> = std::result::Result<T, EnvSealError>;
