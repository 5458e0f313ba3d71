//! `envseal encrypt` — seal the plaintext env file into `.env.encrypted`.

use crate::cli::output;
use crate::cli::{audit, confirm_overwrite, gitignore, pipeline, write_mode, Cli};
use crate::errors::Result;
use crate::store::WriteMode;

/// Execute the `encrypt` command.
pub fn execute(cli: &Cli, append: bool, force: bool) -> Result<()> {
    let mut pipeline = pipeline(cli)?;
    let mode = write_mode(pipeline.settings(), append);
    let artifact = pipeline.settings().encrypted_path(pipeline.root());

    if !confirm_overwrite(&artifact, mode, force)? {
        output::info("Cancelled.");
        return Ok(());
    }

    let report = match pipeline.encrypt(mode) {
        Ok(report) => report,
        Err(e) => {
            audit(&pipeline, "encrypt-failed", None, Some(&e.to_string()));
            return Err(e);
        }
    };

    audit(
        &pipeline,
        "encrypt",
        Some(&report.artifact),
        Some(&format!("{} keys", report.keys)),
    );

    output::success(&format!(
        "Encrypted {} keys from {} into {} ({} mode)",
        report.keys,
        report.source.display(),
        report.artifact.display(),
        pipeline.mode()
    ));
    if report.write_mode == WriteMode::Append {
        output::warning("Appended to the existing artifact; only the newest blob is used on decrypt.");
    }

    gitignore::protect_plaintext(pipeline.root(), pipeline.settings());
    output::tip(&format!(
        "Commit {} and keep ENCRYPTION_KEY out of version control.",
        pipeline.settings().encrypted_file
    ));

    Ok(())
}
