//! `envseal decrypt` — write the decrypted artifact to `.env.decrypted`.

use crate::cli::output;
use crate::cli::{audit, confirm_overwrite, gitignore, pipeline, write_mode, Cli};
use crate::errors::Result;

/// Execute the `decrypt` command.
pub fn execute(cli: &Cli, append: bool, force: bool) -> Result<()> {
    let mut pipeline = pipeline(cli)?;
    let mode = write_mode(pipeline.settings(), append);
    let output_path = pipeline.settings().decrypted_path(pipeline.root());

    if !confirm_overwrite(&output_path, mode, force)? {
        output::info("Cancelled.");
        return Ok(());
    }

    let result = pipeline.decrypt_to_file(mode);
    let report = match result {
        Ok(report) => report,
        Err(e) => {
            audit(&pipeline, "decrypt-failed", None, Some(&e.to_string()));
            return Err(e);
        }
    };

    audit(
        &pipeline,
        "decrypt",
        Some(&report.output),
        Some(&format!("{} keys", report.keys)),
    );

    output::success(&format!(
        "Decrypted {} keys from {} into {}",
        report.keys,
        report.artifact.display(),
        report.output.display()
    ));
    output::warning(&format!(
        "{} holds secrets in plaintext. Delete it when you are done.",
        report.output.display()
    ));

    gitignore::protect_plaintext(pipeline.root(), pipeline.settings());

    Ok(())
}
