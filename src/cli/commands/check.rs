//! `envseal check` — prove the artifact decrypts with the current key.
//!
//! Decrypts in memory only and prints key names with masked values.
//! Useful as a CI step before deploying.

use crate::cli::output;
use crate::cli::{audit, pipeline, Cli};
use crate::env::parse_payload;
use crate::errors::Result;

/// Execute the `check` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let mut pipeline = pipeline(cli)?;
    let decrypted = match pipeline.decrypt() {
        Ok(decrypted) => decrypted,
        Err(e) => {
            audit(&pipeline, "check-failed", None, Some(&e.to_string()));
            return Err(e);
        }
    };
    let pairs = parse_payload(&decrypted.payload);

    audit(
        &pipeline,
        "check",
        Some(&decrypted.artifact),
        Some(&format!("{} keys", pairs.len())),
    );

    output::success(&format!(
        "{} decrypts with the key from {} ({} mode)",
        decrypted.artifact.display(),
        decrypted.source.display(),
        pipeline.mode()
    ));
    output::print_keys_table(&pairs);

    Ok(())
}
