//! Pick the authoritative plaintext env file for a run.

use std::path::{Path, PathBuf};

use super::DeploymentMode;
use crate::errors::{EnvSealError, Result};

/// Default candidates for production, highest priority first.
pub const PRODUCTION_CANDIDATES: &[&str] = &[".env.prod", ".env"];

/// Default candidates for every other mode, highest priority first.
pub const DEVELOPMENT_CANDIDATES: &[&str] = &[".env.dev", ".env"];

/// Return the first candidate that exists under `root`.
///
/// Only checks for existence; the file is not opened.
pub fn resolve(root: &Path, mode: DeploymentMode, candidates: &[String]) -> Result<PathBuf> {
    candidates
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file())
        .ok_or_else(|| EnvSealError::Resolution {
            mode: mode.to_string(),
            candidates: candidates.to_vec(),
        })
}
