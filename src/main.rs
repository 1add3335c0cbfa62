use clap::Parser;
use tracing_subscriber::EnvFilter;

use netscrub::cli::{self, Cli, Commands};

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "netscrub=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("NETSCRUB_LOG")
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match args.command {
        Commands::Scan(scan) => cli::scan::run(&scan)?,
        Commands::Redact(redact) => cli::redact::run(&redact)?,
        Commands::Restore { path, map } => cli::restore::run(&path, &map)?,
    }

    Ok(())
}
