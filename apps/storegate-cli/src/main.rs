//! storegate - check whether console actions are editable for a caller.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use storegate_cli::commands;
use storegate_cli::config::StoregateConfig;
use storegate_cli::error::CliResult;

/// storegate - userstore and scope based permission checks
#[derive(Parser)]
#[command(name = "storegate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate whether an action on a resource is editable
    Check(commands::check::CheckArgs),

    /// List userstores that are read-only
    ReadOnly(commands::read_only::ReadOnlyArgs),

    /// Show the userstore domain of a qualified name
    Domain(commands::domain::DomainArgs),
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,storegate_access=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Commands::Domain(args) => commands::domain::execute(args),
        Commands::Check(args) => {
            let config = StoregateConfig::from_env()?;
            tracing::info!(server_url = %config.server_url, "checking permission");
            commands::check::execute(args, &config).await
        }
        Commands::ReadOnly(args) => {
            let config = StoregateConfig::from_env()?;
            commands::read_only::execute(args, &config).await
        }
    }
}
