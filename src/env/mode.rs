//! Deployment mode selection.

use std::fmt;
use std::str::FromStr;

use crate::errors::{EnvSealError, Result};

/// Value of the mode variable that selects production.
const PRODUCTION: &str = "production";

/// Which ordered list of plaintext candidates is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentMode {
    Production,
    Development,
}

impl DeploymentMode {
    /// Read the mode from the environment variable `var`.
    ///
    /// Only the exact value `production` selects production; anything
    /// else, including an unset variable, selects development.
    pub fn from_env(var: &str) -> Self {
        Self::from_value(std::env::var(var).ok().as_deref())
    }

    /// Map a raw mode-variable value to a mode.
    pub fn from_value(value: Option<&str>) -> Self {
        match value {
            Some(PRODUCTION) => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Development => "development",
        }
    }
}

impl fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses the `--mode` flag. Stricter than [`DeploymentMode::from_value`]
/// so that typos on the command line are caught instead of silently
/// falling back to development.
impl FromStr for DeploymentMode {
    type Err = EnvSealError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "development" | "dev" => Ok(Self::Development),
            other => Err(EnvSealError::ConfigError(format!(
                "unknown mode '{other}' — use 'production' or 'development'"
            ))),
        }
    }
}
