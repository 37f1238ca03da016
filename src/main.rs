//! blobctl - Azure Blob Storage administration tool
//!
//! Changes access tiers in bulk and copies blobs between storage accounts.

use blobctl::cli::{failure_line, Cli, Commands};
use blobctl::config::{self, Config};
use blobctl::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let cli = Cli::parse();

    // Execute the command
    if let Err(e) = run(cli).await {
        error!("Error: {}", e);
        eprintln!("{}", failure_line(&e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Config commands read the file themselves and must work when it is broken
    let config = match &cli.command {
        Commands::Config { .. } | Commands::Version => Config::default(),
        _ => config::load_config().await?,
    };

    init_logging(cli.debug || config.debug);
    info!("Starting blobctl");

    cli.execute(config).await
}

fn init_logging(debug: bool) {
    let default_filter = if debug { "blobctl=debug" } else { "blobctl=warn" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
