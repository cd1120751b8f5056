//! Grabarr CLI
//!
//! Request movies and TV shows from Radarr and Sonarr.

use clap::Parser;
use grabarr::cli::{
    args::{Cli, Commands},
    commands::{check, request},
};
use grabarr::models::media::MediaKind;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    let config = cli.config.as_deref();

    match cli.command {
        Commands::Movie { title, requester } => {
            request::request(config, MediaKind::Movie, &title.join(" "), requester.as_deref())
                .await?;
        }

        Commands::Show { title, requester } => {
            request::request(config, MediaKind::Series, &title.join(" "), requester.as_deref())
                .await?;
        }

        Commands::Check => {
            check::check(config).await?;
        }
    }

    Ok(())
}

/// Initialize the logging system.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("grabarr=debug")
    } else {
        EnvFilter::new("grabarr=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}
