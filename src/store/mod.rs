//! Durable artifact storage.
//!
//! Artifacts are plain text files next to the project's env files.
//! Nothing here locks: two writers on the same path at once is the
//! caller's problem.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{EnvSealError, Result};

/// How an artifact write treats an existing file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Replace the file atomically.
    #[default]
    Overwrite,
    /// Append with no delimiter, creating the file if absent.
    Append,
}

/// Append `text` to `path`, creating it if absent. No delimiter is added.
pub fn append(path: &Path, text: &str) -> Result<()> {
    let mut options = OpenOptions::new();
    options.create(true).append(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(text.as_bytes())?;
    file.sync_all()?;
    Ok(())
}

/// Write `text` to `path` according to `mode`.
///
/// `Overwrite` writes a sibling temp file and renames it over the
/// target, so readers never see a half-written artifact.
pub fn write(path: &Path, text: &str, mode: WriteMode) -> Result<()> {
    match mode {
        WriteMode::Append => append(path, text),
        WriteMode::Overwrite => {
            let parent = path.parent().unwrap_or(Path::new("."));
            let tmp_path = parent.join(format!(
                ".{}.tmp",
                path.file_name().unwrap_or_default().to_string_lossy()
            ));

            // A stale temp file from an interrupted run would otherwise
            // keep its old permissions.
            if tmp_path.exists() {
                fs::remove_file(&tmp_path)?;
            }
            append(&tmp_path, text)?;
            fs::rename(&tmp_path, path)?;
            Ok(())
        }
    }
}

/// Read the whole artifact at `path` as text.
pub fn read(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(EnvSealError::ArtifactNotFound(path.to_path_buf()));
    }
    Ok(fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn append_creates_then_accumulates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env.encrypted");

        append(&path, "one").unwrap();
        append(&path, "two").unwrap();

        assert_eq!(read(&path).unwrap(), "onetwo");
    }

    #[test]
    fn overwrite_replaces_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env.encrypted");

        write(&path, "first", WriteMode::Overwrite).unwrap();
        write(&path, "second", WriteMode::Overwrite).unwrap();

        assert_eq!(read(&path).unwrap(), "second");
        assert!(!dir.path().join("..env.encrypted.tmp").exists());
    }

    #[test]
    fn write_append_mode_accumulates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env.decrypted");

        write(&path, "A=1\n", WriteMode::Append).unwrap();
        write(&path, "B=2\n", WriteMode::Append).unwrap();

        assert_eq!(read(&path).unwrap(), "A=1\nB=2\n");
    }

    #[test]
    fn read_missing_is_artifact_not_found() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env.encrypted");
        assert!(matches!(read(&path), Err(EnvSealError::ArtifactNotFound(p)) if p == path));
    }

    #[test]
    fn write_mode_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            mode: WriteMode,
        }
        let w: Wrapper = toml::from_str("mode = \"append\"").unwrap();
        assert_eq!(w.mode, WriteMode::Append);
        assert_eq!(WriteMode::default(), WriteMode::Overwrite);
    }

    #[cfg(unix)]
    #[test]
    fn artifacts_are_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env.decrypted");
        write(&path, "A=1\n", WriteMode::Overwrite).unwrap();

        let perms = fs::metadata(&path).unwrap().permissions();
        assert_eq!(perms.mode() & 0o777, 0o600);
    }
}
