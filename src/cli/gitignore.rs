//! Keep plaintext env files out of git.
//!
//! `encrypt` and `decrypt` call this so the files holding secrets in the
//! clear (the plaintext candidates and the decrypted artifact) are ignored
//! while `.env.encrypted` stays committable.

use std::fs;
use std::path::Path;

use crate::cli::output;
use crate::config::Settings;

/// Append each missing entry to `.gitignore`, creating it if needed.
///
/// Returns the entries that were added. Write errors are ignored:
/// gitignore is a convenience, not a requirement.
pub fn ensure_ignored(project_dir: &Path, entries: &[&str]) -> Vec<String> {
    let gitignore_path = project_dir.join(".gitignore");
    let existing = fs::read_to_string(&gitignore_path).unwrap_or_default();

    let mut added: Vec<String> = Vec::new();
    for entry in entries {
        let already = existing.lines().any(|line| line.trim() == *entry)
            || added.iter().any(|a| a.as_str() == *entry);
        if !already {
            added.push((*entry).to_string());
        }
    }

    if added.is_empty() {
        return added;
    }

    let separator = if existing.ends_with('\n') || existing.is_empty() {
        ""
    } else {
        "\n"
    };
    let content = format!("{existing}{separator}{}\n", added.join("\n"));

    if fs::write(&gitignore_path, content).is_err() {
        return Vec::new();
    }
    added
}

/// Ignore every plaintext file envseal reads or writes for this project.
pub fn protect_plaintext(project_dir: &Path, settings: &Settings) {
    let mut entries: Vec<&str> = settings
        .production_candidates
        .iter()
        .chain(&settings.development_candidates)
        .map(String::as_str)
        .collect();
    entries.push(&settings.decrypted_file);
    entries.push(".envseal/");

    let added = ensure_ignored(project_dir, &entries);
    if !added.is_empty() {
        output::info(&format!("Added {} to .gitignore", added.join(", ")));
    }
}
