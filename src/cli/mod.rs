//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod gitignore;
pub mod output;

use std::path::{Path, PathBuf};

use clap::Parser;
use dialoguer::Confirm;

use crate::config::Settings;
use crate::env::DeploymentMode;
use crate::errors::{EnvSealError, Result};
use crate::pipeline::Pipeline;
use crate::store::WriteMode;

/// envseal CLI: encrypt .env secrets for source control.
#[derive(Parser)]
#[command(
    name = "envseal",
    about = "Encrypt .env secrets for source control and decrypt them just-in-time",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Project root (default: current directory)
    #[arg(long, global = true)]
    pub root: Option<String>,

    /// Deployment mode: production or development (default: read from $NODE_ENV)
    #[arg(short, long, global = true)]
    pub mode: Option<DeploymentMode>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Encrypt the plaintext env file into .env.encrypted
    Encrypt {
        /// Append to the artifact instead of replacing it
        #[arg(long)]
        append: bool,
        /// Overwrite an existing artifact without asking
        #[arg(short, long)]
        force: bool,
    },

    /// Decrypt .env.encrypted into .env.decrypted
    Decrypt {
        /// Append to the output instead of replacing it
        #[arg(long)]
        append: bool,
        /// Overwrite an existing output without asking
        #[arg(short, long)]
        force: bool,
    },

    /// Run a command with decrypted secrets injected
    Run {
        /// Command and arguments (after --)
        #[arg(trailing_var_arg = true, required = true)]
        command: Vec<String>,

        /// Start with a clean environment (only decrypted secrets, no inherited vars)
        #[arg(long)]
        clean_env: bool,
    },

    /// Verify the artifact decrypts and list the keys it holds
    Check,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    /// View the audit log of envseal operations
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
    },

    /// Show version information
    Version,
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// The project root: `--root` if given, otherwise the current directory.
pub fn project_root(cli: &Cli) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(match &cli.root {
        Some(root) => cwd.join(root),
        None => cwd,
    })
}

/// Build the pipeline for this invocation.
///
/// `--mode` wins over the configured mode variable.
pub fn pipeline(cli: &Cli) -> Result<Pipeline> {
    let root = project_root(cli)?;
    let settings = Settings::load(&root)?;
    let mode = cli.mode.unwrap_or_else(|| settings.mode_from_env());
    Ok(Pipeline::new(root, mode, settings))
}

/// `--append` forces append; otherwise the configured default applies.
pub fn write_mode(settings: &Settings, append: bool) -> WriteMode {
    if append {
        WriteMode::Append
    } else {
        settings.write_mode
    }
}

/// Ask before replacing an existing file.
///
/// Returns `true` when the write may proceed.  Appending and `--force`
/// never prompt.
pub fn confirm_overwrite(path: &Path, mode: WriteMode, force: bool) -> Result<bool> {
    if force || mode == WriteMode::Append || !path.exists() {
        return Ok(true);
    }

    Confirm::new()
        .with_prompt(format!("{} already exists. Overwrite?", path.display()))
        .default(false)
        .interact()
        .map_err(|e| EnvSealError::CommandFailed(format!("confirm prompt: {e}")))
}

/// Record an operation in the audit log (no-op without `audit-log`).
pub fn audit(pipeline: &Pipeline, op: &str, artifact: Option<&Path>, details: Option<&str>) {
    #[cfg(feature = "audit-log")]
    crate::audit::log_audit(
        pipeline.root(),
        op,
        pipeline.mode().as_str(),
        artifact,
        details,
    );

    #[cfg(not(feature = "audit-log"))]
    let _ = (pipeline, op, artifact, details);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn append_flag_overrides_settings() {
        let s = Settings::default();
        assert_eq!(write_mode(&s, true), WriteMode::Append);
        assert_eq!(write_mode(&s, false), WriteMode::Overwrite);

        let s = Settings {
            write_mode: WriteMode::Append,
            ..Settings::default()
        };
        assert_eq!(write_mode(&s, false), WriteMode::Append);
    }

    #[test]
    fn confirm_skips_prompt_when_safe() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env.encrypted");

        // Missing file: nothing to overwrite.
        assert!(confirm_overwrite(&path, WriteMode::Overwrite, false).unwrap());

        std::fs::write(&path, "x").unwrap();
        assert!(confirm_overwrite(&path, WriteMode::Append, false).unwrap());
        assert!(confirm_overwrite(&path, WriteMode::Overwrite, true).unwrap());
    }

    #[test]
    fn mode_flag_parses() {
        let cli = Cli::try_parse_from(["envseal", "--mode", "production", "check"]).unwrap();
        assert_eq!(cli.mode, Some(DeploymentMode::Production));

        assert!(Cli::try_parse_from(["envseal", "--mode", "qa", "check"]).is_err());
    }

    #[test]
    fn pipeline_uses_mode_flag() {
        let dir = TempDir::new().unwrap();
        let cli = Cli::try_parse_from([
            "envseal",
            "--root",
            dir.path().to_str().unwrap(),
            "--mode",
            "prod",
            "check",
        ])
        .unwrap();

        let p = pipeline(&cli).unwrap();
        assert_eq!(p.mode(), DeploymentMode::Production);
        assert_eq!(p.root(), dir.path());
    }
}
