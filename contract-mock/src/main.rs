//! Contract Gateway Mock
//!
//! Serves the real-estate contract's views and purchase write from memory.
//! Meant for local development and integration tests.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

use contract_mock::{run_server, Registry};

#[derive(Debug)]
struct Config {
    server_host: String,
    server_port: u16,
    seed_file: Option<PathBuf>,
}

impl Config {
    fn from_env() -> Result<Self> {
        dotenv::dotenv().ok(); // Load .env file if present

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3001".to_string())
            .parse()
            .context("Invalid SERVER_PORT")?;

        let seed_file = env::var("SEED_FILE").ok().map(PathBuf::from);

        Ok(Self {
            server_host,
            server_port,
            seed_file,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting contract gateway mock...");

    let config = Config::from_env().context("Failed to load configuration")?;
    log::info!("Server will listen on {}:{}", config.server_host, config.server_port);

    let registry = match &config.seed_file {
        Some(path) => Registry::from_seed_file(path)
            .with_context(|| format!("Failed to load seed file {}", path.display()))?,
        None => Registry::new(),
    };

    run_server(registry.shared(), config.server_host, config.server_port)
        .await
        .context("Server error")?;

    Ok(())
}
