//! One module per subcommand. Each exposes an `execute` function.

#[cfg(feature = "audit-log")]
pub mod audit_cmd;
pub mod check;
pub mod completions;
pub mod decrypt;
pub mod encrypt;
pub mod run;
pub mod version;
