//! `envseal version` — display version and artifact format.

use console::style;

use crate::crypto::MARKER;
use crate::errors::Result;

/// Execute the `version` command.
pub fn execute() -> Result<()> {
    println!("envseal {}", env!("CARGO_PKG_VERSION"));
    println!(
        "{} {}",
        style("artifact format:").dim(),
        style(MARKER.trim_end_matches('$')).cyan()
    );
    Ok(())
}
