//! `envseal run` — inject decrypted secrets into a child process.
//!
//! Secrets are collected into a `ConfigContext` and handed to the child
//! only; envseal's own process environment is left untouched.

use std::process::Command;

use crate::cli::output;
use crate::cli::{audit, pipeline, Cli};
use crate::env::ConfigContext;
use crate::errors::{EnvSealError, Result};

/// Execute the `run` command.
pub fn execute(cli: &Cli, command: &[String], clean_env: bool) -> Result<()> {
    let (program, args) = command
        .split_first()
        .ok_or(EnvSealError::NoCommandSpecified)?;

    let mut pipeline = pipeline(cli)?;
    let mut secrets = ConfigContext::new();
    let report = match pipeline.configure(&mut secrets) {
        Ok(report) => report,
        Err(e) => {
            audit(&pipeline, "run-failed", None, Some(&e.to_string()));
            return Err(e);
        }
    };

    // Later duplicates overwrite earlier ones in the context.
    let injected = secrets.len();

    audit(
        &pipeline,
        "run",
        Some(&report.artifact),
        Some(&format!("{injected} keys, program: {program}")),
    );

    if clean_env {
        output::success(&format!("Injected {injected} secrets into clean environment"));
    } else {
        output::success(&format!("Injected {injected} secrets into environment"));
    }

    let mut cmd = Command::new(program);
    cmd.args(args);

    if clean_env {
        cmd.env_clear();
    }

    let status = cmd.envs(secrets.iter()).status()?;

    match status.code() {
        Some(0) => Ok(()),
        Some(code) => Err(EnvSealError::ChildProcessFailed(code)),
        None => Err(EnvSealError::CommandFailed(
            "child process terminated by signal".into(),
        )),
    }
}
