//! Audit log — SQLite-based operation history.
//!
//! Records every encrypt/decrypt/run in `<root>/.envseal/audit.db`:
//! which operation, which deployment mode, which artifact, and how many
//! keys were involved.  Key names and values are never recorded.
//!
//! Designed for graceful degradation: if the database can't be opened or
//! written to, operations silently continue without logging.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Connection;

use crate::errors::{EnvSealError, Result};

/// Directory under the project root that holds the audit database.
pub const AUDIT_DIR: &str = ".envseal";

const DB_NAME: &str = "audit.db";

/// A single audit log entry.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub operation: String,
    pub mode: String,
    pub artifact: Option<String>,
    pub details: Option<String>,
}

/// SQLite-backed audit log.
pub struct AuditLog {
    conn: Connection,
}

impl AuditLog {
    /// Open (or create) the audit database inside `audit_dir`.
    ///
    /// Returns `None` if the database can't be opened — callers should
    /// treat this as "audit logging unavailable" and continue normally.
    pub fn open(audit_dir: &Path) -> Option<Self> {
        let db_path = Self::db_path(audit_dir);
        let conn = Connection::open(&db_path).ok()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&db_path, perms);
        }

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS audit_log (
                id        INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                operation TEXT NOT NULL,
                mode      TEXT NOT NULL,
                artifact  TEXT,
                details   TEXT
            );",
        )
        .ok()?;

        Some(Self { conn })
    }

    /// Open the audit log for a project, creating `.envseal/` if needed.
    pub fn open_project(root: &Path) -> Option<Self> {
        let dir = root.join(AUDIT_DIR);
        std::fs::create_dir_all(&dir).ok()?;
        Self::open(&dir)
    }

    /// Record an operation. Fire-and-forget — errors are silently ignored.
    pub fn log(&self, operation: &str, mode: &str, artifact: Option<&str>, details: Option<&str>) {
        let now = timestamp(Utc::now());
        let _ = self.conn.execute(
            "INSERT INTO audit_log (timestamp, operation, mode, artifact, details)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![now, operation, mode, artifact, details],
        );
    }

    /// Query recent audit entries, most recent first.
    ///
    /// - `limit`: maximum number of entries to return.
    /// - `since`: if provided, only return entries at or after this time.
    pub fn query(&self, limit: usize, since: Option<DateTime<Utc>>) -> Result<Vec<AuditEntry>> {
        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        let since_str = since.map(timestamp).unwrap_or_default();

        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, timestamp, operation, mode, artifact, details
                 FROM audit_log
                 WHERE timestamp >= ?1
                 ORDER BY id DESC
                 LIMIT ?2",
            )
            .map_err(|e| EnvSealError::AuditError(format!("query prepare: {e}")))?;

        let rows = stmt
            .query_map(rusqlite::params![since_str, limit_i64], |row| {
                let ts_str: String = row.get(1)?;
                let timestamp = DateTime::parse_from_rfc3339(&ts_str)
                    .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

                Ok(AuditEntry {
                    id: row.get(0)?,
                    timestamp,
                    operation: row.get(2)?,
                    mode: row.get(3)?,
                    artifact: row.get(4)?,
                    details: row.get(5)?,
                })
            })
            .map_err(|e| EnvSealError::AuditError(format!("query exec: {e}")))?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| EnvSealError::AuditError(format!("row parse: {e}")))
    }

    /// Path to the audit database inside `audit_dir`.
    pub fn db_path(audit_dir: &Path) -> PathBuf {
        audit_dir.join(DB_NAME)
    }
}

/// Fixed-width UTC RFC 3339, so stored timestamps compare lexically.
fn timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Log an event for the project at `root`, ignoring every failure.
pub fn log_audit(root: &Path, operation: &str, mode: &str, artifact: Option<&Path>, details: Option<&str>) {
    if let Some(audit) = AuditLog::open_project(root) {
        let artifact = artifact.map(|p| p.display().to_string());
        audit.log(operation, mode, artifact.as_deref(), details);
    }
}
