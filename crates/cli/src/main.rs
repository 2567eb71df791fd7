//! Hayat CLI - database tooling for the storefront.
//!
//! # Usage
//!
//! ```bash
//! # Apply pending storefront migrations
//! hayat-cli migrate
//!
//! # Show which migrations have been applied
//! hayat-cli migrate --status
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "hayat-cli")]
#[command(author, version, about = "Hayat storefront CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate {
        /// List applied and pending migrations instead of running them
        #[arg(long)]
        status: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::migrate::MigrationError> {
    match cli.command {
        Commands::Migrate { status: false } => commands::migrate::run().await,
        Commands::Migrate { status: true } => commands::migrate::status().await,
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_migrate_status() {
        let cli = Cli::try_parse_from(["hayat-cli", "migrate", "--status"]);
        assert!(matches!(cli.map(|c| c.command), Ok(Commands::Migrate { status: true })));
    }
}
