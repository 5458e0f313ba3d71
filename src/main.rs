use clap::Parser;
use envseal::cli::{commands, Cli, Commands};
use envseal::EnvSealError;

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Encrypt { append, force } => commands::encrypt::execute(&cli, append, force),
        Commands::Decrypt { append, force } => commands::decrypt::execute(&cli, append, force),
        Commands::Run {
            ref command,
            clean_env,
        } => commands::run::execute(&cli, command, clean_env),
        Commands::Check => commands::check::execute(&cli),
        Commands::Completions { shell } => commands::completions::execute(shell),
        Commands::Audit { last, ref since } => audit(&cli, last, since.as_deref()),
        Commands::Version => commands::version::execute(),
    };

    if let Err(e) = result {
        envseal::cli::output::error(&e.to_string());
        if let EnvSealError::ChildProcessFailed(code) = e {
            std::process::exit(code);
        }
        std::process::exit(1);
    }
}

#[cfg(feature = "audit-log")]
fn audit(cli: &Cli, last: usize, since: Option<&str>) -> envseal::Result<()> {
    commands::audit_cmd::execute(cli, last, since)
}

#[cfg(not(feature = "audit-log"))]
fn audit(_cli: &Cli, _last: usize, _since: Option<&str>) -> envseal::Result<()> {
    Err(EnvSealError::AuditError(
        "built without the `audit-log` feature".into(),
    ))
}
