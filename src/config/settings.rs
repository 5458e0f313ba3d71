use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::Argon2Params;
use crate::env::resolver::{DEVELOPMENT_CANDIDATES, PRODUCTION_CANDIDATES};
use crate::env::DeploymentMode;
use crate::errors::{EnvSealError, Result};
use crate::store::WriteMode;

/// Project-level configuration, loaded from `.envseal.toml`.
///
/// Every field has a sensible default so envseal works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Environment variable that selects the deployment mode.
    #[serde(default = "default_mode_variable")]
    pub mode_variable: String,

    /// Plaintext candidates for production, highest priority first.
    #[serde(default = "default_production_candidates")]
    pub production_candidates: Vec<String>,

    /// Plaintext candidates for every other mode, highest priority first.
    #[serde(default = "default_development_candidates")]
    pub development_candidates: Vec<String>,

    /// Encrypted artifact, relative to the project root.
    #[serde(default = "default_encrypted_file")]
    pub encrypted_file: String,

    /// Decrypted artifact, relative to the project root.
    #[serde(default = "default_decrypted_file")]
    pub decrypted_file: String,

    /// Whether artifact writes overwrite or append.
    #[serde(default)]
    pub write_mode: WriteMode,

    /// Argon2 memory cost in KiB (default: 64 MB).
    #[serde(default = "default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,

    /// Argon2 iteration count (default: 3).
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,

    /// Argon2 parallelism degree (default: 4).
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_mode_variable() -> String {
    "NODE_ENV".to_string()
}

fn default_production_candidates() -> Vec<String> {
    PRODUCTION_CANDIDATES.iter().map(|s| s.to_string()).collect()
}

fn default_development_candidates() -> Vec<String> {
    DEVELOPMENT_CANDIDATES.iter().map(|s| s.to_string()).collect()
}

fn default_encrypted_file() -> String {
    ".env.encrypted".to_string()
}

fn default_decrypted_file() -> String {
    ".env.decrypted".to_string()
}

fn default_argon2_memory_kib() -> u32 {
    65_536 // 64 MB
}

fn default_argon2_iterations() -> u32 {
    3
}

fn default_argon2_parallelism() -> u32 {
    4
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode_variable: default_mode_variable(),
            production_candidates: default_production_candidates(),
            development_candidates: default_development_candidates(),
            encrypted_file: default_encrypted_file(),
            decrypted_file: default_decrypted_file(),
            write_mode: WriteMode::default(),
            argon2_memory_kib: default_argon2_memory_kib(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    pub const FILE_NAME: &'static str = ".envseal.toml";

    /// Load settings from `<project_dir>/.envseal.toml`.
    ///
    /// If the file does not exist, defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            EnvSealError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        if settings.production_candidates.is_empty() || settings.development_candidates.is_empty()
        {
            return Err(EnvSealError::ConfigError(format!(
                "{}: candidate lists cannot be empty",
                config_path.display()
            )));
        }

        Ok(settings)
    }

    /// The ordered plaintext candidates for `mode`.
    pub fn candidates(&self, mode: DeploymentMode) -> &[String] {
        match mode {
            DeploymentMode::Production => &self.production_candidates,
            DeploymentMode::Development => &self.development_candidates,
        }
    }

    /// Deployment mode taken from the configured mode variable.
    pub fn mode_from_env(&self) -> DeploymentMode {
        DeploymentMode::from_env(&self.mode_variable)
    }

    pub fn encrypted_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.encrypted_file)
    }

    pub fn decrypted_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.decrypted_file)
    }

    /// Convert the Argon2 settings into crypto-layer params.
    pub fn argon2_params(&self) -> Argon2Params {
        Argon2Params {
            memory_kib: self.argon2_memory_kib,
            iterations: self.argon2_iterations,
            parallelism: self.argon2_parallelism,
        }
    }

    /// Highest Argon2 costs a blob may ask for on decrypt.
    ///
    /// Blobs sealed with the built-in defaults or with the configured
    /// costs are accepted. Anything costlier is refused before derivation.
    pub fn argon2_limit(&self) -> Argon2Params {
        self.argon2_params().max_with(Argon2Params::default())
    }
}

// ── Tests ────────────────────────────────────────────────────────────
