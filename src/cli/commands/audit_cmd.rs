//! `envseal audit` — display the audit log.
//!
//! Usage:
//!   envseal audit               # show last 50 entries
//!   envseal audit --last 20     # show last 20
//!   envseal audit --since 7d    # entries from last 7 days

use chrono::{DateTime, Duration, Utc};
use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::audit::{AuditEntry, AuditLog};
use crate::cli::output;
use crate::cli::{project_root, Cli};
use crate::errors::{EnvSealError, Result};

/// Execute the `audit` command.
pub fn execute(cli: &Cli, last: usize, since: Option<&str>) -> Result<()> {
    let root = project_root(cli)?;

    let audit = AuditLog::open_project(&root)
        .ok_or_else(|| EnvSealError::AuditError("failed to open audit database".into()))?;

    let since_dt = since.map(parse_since).transpose()?;
    let entries = audit.query(last, since_dt)?;

    if entries.is_empty() {
        output::info("No audit entries found.");
        return Ok(());
    }

    print_audit_table(&entries);
    Ok(())
}

/// Parse "7d", "24h" or "30m" into the instant that long ago.
fn parse_since(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();
    let invalid = || {
        EnvSealError::CommandFailed(format!(
            "invalid duration '{input}' — use format like 7d, 24h, or 30m"
        ))
    };

    let split = input.len().checked_sub(1).ok_or_else(invalid)?;
    if !input.is_char_boundary(split) {
        return Err(invalid());
    }
    let (num_str, unit) = input.split_at(split);
    let num: i64 = num_str.parse().map_err(|_| invalid())?;

    let duration = match unit {
        "d" => Duration::try_days(num),
        "h" => Duration::try_hours(num),
        "m" => Duration::try_minutes(num),
        _ => None,
    }
    .ok_or_else(invalid)?;

    Ok(Utc::now() - duration)
}

/// Print audit entries in a formatted table.
fn print_audit_table(entries: &[AuditEntry]) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Operation", "Mode", "Artifact", "Details"]);

    for entry in entries {
        table.add_row(vec![
            entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            colorize_operation(&entry.operation),
            entry.mode.clone(),
            entry.artifact.clone().unwrap_or_else(|| "-".into()),
            entry.details.clone().unwrap_or_else(|| "-".into()),
        ]);
    }

    println!(
        "{}",
        style(format!("{} audit entries:", entries.len())).bold()
    );
    println!("{table}");
}

fn colorize_operation(op: &str) -> String {
    match op {
        "encrypt" => style(op).green().to_string(),
        "decrypt" => style(op).yellow().to_string(),
        "run" | "check" => style(op).blue().to_string(),
        _ if op.ends_with("-failed") => style(op).red().to_string(),
        _ => op.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_since_units() {
        let days = Utc::now() - parse_since("7d").unwrap();
        assert!((days.num_days() - 7).abs() <= 1);

        let hours = Utc::now() - parse_since("24h").unwrap();
        assert!((hours.num_hours() - 24).abs() <= 1);

        let minutes = Utc::now() - parse_since(" 30m ").unwrap();
        assert!((minutes.num_minutes() - 30).abs() <= 1);
    }

    #[test]
    fn parse_since_invalid() {
        assert!(parse_since("").is_err());
        assert!(parse_since("abc").is_err());
        assert!(parse_since("7x").is_err());
        assert!(parse_since("d").is_err());
        assert!(parse_since("7é").is_err());
    }

    #[test]
    fn failed_operations_are_highlighted() {
        assert!(!colorize_operation("run-failed").is_empty());
        assert!(!colorize_operation("unknown").is_empty());
    }
}
