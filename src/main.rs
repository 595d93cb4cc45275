use std::io;

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

use client_manager::{ClientRepository, ConnectionManager, config, ui::Menu};

fn init_tracing() -> Result<()> {
    // Quiet by default so log lines do not interleave with the menu
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    // Load configuration
    let config = config::init().context("failed to load configuration")?;

    // Initialize database connection
    let manager = ConnectionManager::from_config(&config);
    manager
        .initialize()
        .await
        .context("failed to initialize the database connection")?;
    println!("Database connection established");

    let repo = ClientRepository::new(&manager)?.with_timeout(config.statement_timeout());

    let stdin = io::stdin();
    let result = Menu::new(&repo, stdin.lock(), io::stdout()).run().await;

    manager.close().await;
    println!("\nDatabase connection closed");

    result?;
    Ok(())
}
