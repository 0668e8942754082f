mod cmd;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "stopgate",
    about = "Post-task quality gate — run a project's own lint/type-check/format scripts and block completion on failures",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from package.json)
    #[arg(long, global = true, env = "STOPGATE_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run as a Stop hook: read the orchestrator payload from stdin, emit a
    /// block decision on stdout (silence means allow). Always exits 0.
    Stop,

    /// Run the same checks directly and print a report. Exits 1 on failures.
    Check,
}

fn main() {
    let cli = Cli::parse();

    // Diagnostics stay on stderr; stdout is the hook protocol surface.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        // The hook path never signals failure via exit code: the orchestrator
        // reads exit 0 + stdout content as the decision, and anything else as
        // a crashed hook.
        Commands::Stop => cmd::stop::run(cli.root.as_deref()),
        Commands::Check => match cmd::check::run(cli.root.as_deref(), cli.json) {
            Ok(true) => {}
            Ok(false) => std::process::exit(1),
            Err(e) => {
                eprintln!("error: {e:#}");
                std::process::exit(1);
            }
        },
    }
}
