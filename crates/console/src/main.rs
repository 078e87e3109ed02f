use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use catalog_console::cli::Cli;
use catalog_console::commands::{self, Context};
use catalog_console::config::Config;
use catalog_console::logging::init_logging;
use catalog_console::notify::ConsoleNotifier;
use client::services::CatalogClient;
use client::transport::HttpTransport;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.api_url.as_deref())?;

    // Initialize logging
    init_logging(&config.logging, cli.verbose);

    info!("Starting catalog console v{}", env!("CARGO_PKG_VERSION"));
    info!(base_url = %config.api.base_url, "Using catalog API");

    let transport = HttpTransport::new(&config.api_config())?;
    let notifier = ConsoleNotifier::new(cli.quiet);
    let client = CatalogClient::new(Arc::new(transport), Arc::new(notifier));
    let ctx = Context::new(client, config.console.page_size, cli.json);

    let output = commands::run(cli.command, &ctx).await?;
    println!("{output}");

    Ok(())
}
