//! Common test utilities for marketplace integration tests
//!
//! - File-backed client storage in a temp directory
//! - In-process contract gateway mock on an ephemeral port
//! - Helpers for seeding listings and confirming purchases

use std::sync::Arc;

use contract_mock::{Registry, SharedRegistry};
use drearl::{ChainFacade, FileStorage, GatewayClient, MarketplaceConfig};
use serde_json::Value;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test environment with automatic cleanup
pub struct TestEnvironment {
    pub temp_dir: TempDir,
    pub storage: Arc<FileStorage>,
    pub gateway_url: String,
    pub registry: SharedRegistry,
    pub http: reqwest::Client,
}

impl TestEnvironment {
    pub async fn new() -> anyhow::Result<Self> {
        let _ = env_logger::builder().is_test(true).try_init();

        let temp_dir = TempDir::new()?;
        log::info!("Test directory: {:?}", temp_dir.path());
        let storage = Arc::new(FileStorage::new_with_base_dir(temp_dir.path().to_path_buf()));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let gateway_url = format!("http://{}", listener.local_addr()?);
        let registry = Registry::new().shared();
        tokio::spawn(contract_mock::serve(listener, registry.clone()));
        log::info!("Contract gateway mock at {}", gateway_url);

        Ok(Self {
            temp_dir,
            storage,
            gateway_url,
            registry,
            http: reqwest::Client::new(),
        })
    }

    pub fn config(&self) -> MarketplaceConfig {
        MarketplaceConfig::local(&self.gateway_url, self.temp_dir.path().to_path_buf())
    }

    pub fn facade(&self) -> ChainFacade<GatewayClient> {
        ChainFacade::new(GatewayClient::from_config(&self.config()))
    }

    /// List an asset on the mock contract under `account`
    pub async fn seed_listing(&self, account: &str, asset: Value) -> anyhow::Result<()> {
        self.http
            .post(format!("{}/dev/listings", self.gateway_url))
            .json(&serde_json::json!({ "account": account, "asset": asset }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Confirm every pending purchase on the mock contract
    pub async fn confirm_purchases(&self) -> anyhow::Result<Value> {
        let body = self
            .http
            .post(format!("{}/dev/confirm", self.gateway_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(body)
    }
}
