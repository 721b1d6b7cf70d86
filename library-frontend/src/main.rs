use clap::Parser;
use library_core::observability::init_tracing;
use library_frontend::commands::{self, Command};
use library_frontend::config::get_configuration;
use library_frontend::services::{CatalogStore, HttpCatalogClient, StaticCredential};
use library_frontend::AppState;
use std::sync::Arc;

/// Browse, upload and remove PDFs in the library catalog.
#[derive(Parser)]
#[command(name = "pdf-library", version)]
struct Cli {
    /// API key for uploads and removals; overrides the configured key.
    #[arg(long, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "pdf-library",
        &configuration.logging.level,
        configuration.logging.otlp_endpoint.as_deref(),
    );

    let client = HttpCatalogClient::new(&configuration.catalog)?;
    tracing::debug!(base_url = %client.base_url(), "Catalog client ready");

    let credential_policy = configuration.catalog.credential_policy();
    let app = AppState::new(
        Arc::new(CatalogStore::new(Arc::new(client))),
        Arc::new(StaticCredential::new(configuration.catalog.api_key)),
        credential_policy,
    );

    commands::run(&app, cli.command, cli.api_key).await
}
