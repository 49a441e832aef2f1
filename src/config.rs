//! Marketplace configuration from environment variables
//!
//! Controls which contract gateway the chain facade talks to and where the
//! durable client storage lives. Defaults to the testnet gateway.

use std::env;
use std::path::PathBuf;

/// Network the contract is deployed on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Network {
    Testnet,
    Mainnet,
    Local,
}

impl Network {
    fn default_gateway_url(self) -> &'static str {
        match self {
            Network::Testnet => "https://testnet.drearl.app/api",
            Network::Mainnet => "https://drearl.app/api",
            Network::Local => "http://localhost:3001",
        }
    }
}

#[derive(Clone, Debug)]
pub struct MarketplaceConfig {
    pub network: Network,
    /// Base URL of the contract gateway
    pub gateway_url: String,
    /// Deployed contract address, passed through to the gateway when set
    pub contract_address: Option<String>,
    /// Directory backing the durable client storage
    pub storage_dir: PathBuf,
}

impl MarketplaceConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `DREARL_NETWORK`: "testnet" (default), "mainnet" or "local"
    /// - `DREARL_GATEWAY_URL`: contract gateway endpoint (optional, per-network default)
    /// - `DREARL_CONTRACT_ADDRESS`: deployed contract address (optional)
    /// - `DREARL_STORAGE_DIR`: storage directory (default "./.drearl")
    ///
    /// A `.env` file in the working directory is honoured.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let network_str = env::var("DREARL_NETWORK")
            .unwrap_or_else(|_| "testnet".to_string())
            .to_lowercase();

        let network = match network_str.as_str() {
            "testnet" | "" => {
                log::info!("Using TESTNET contract deployment");
                Network::Testnet
            }
            "mainnet" => {
                log::info!("Using MAINNET contract deployment");
                Network::Mainnet
            }
            "local" => {
                log::info!("Using LOCAL contract gateway");
                Network::Local
            }
            other => {
                log::warn!("Unknown network '{}', defaulting to testnet", other);
                Network::Testnet
            }
        };

        let gateway_url = env::var("DREARL_GATEWAY_URL")
            .unwrap_or_else(|_| network.default_gateway_url().to_string());
        log::info!("Contract gateway: {}", gateway_url);

        let contract_address = env::var("DREARL_CONTRACT_ADDRESS").ok();
        if let Some(ref address) = contract_address {
            log::info!("Contract address: {}", address);
        }

        let storage_dir = env::var("DREARL_STORAGE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./.drearl"));
        log::debug!("Client storage directory: {:?}", storage_dir);

        Self {
            network,
            gateway_url: gateway_url.trim_end_matches('/').to_string(),
            contract_address,
            storage_dir,
        }
    }

    /// Configuration pointing at a locally running gateway (tests, development)
    pub fn local(gateway_url: impl Into<String>, storage_dir: PathBuf) -> Self {
        Self {
            network: Network::Local,
            gateway_url: gateway_url.into().trim_end_matches('/').to_string(),
            contract_address: None,
            storage_dir,
        }
    }
}

impl Default for MarketplaceConfig {
    /// Default configuration (testnet)
    fn default() -> Self {
        Self {
            network: Network::Testnet,
            gateway_url: Network::Testnet.default_gateway_url().to_string(),
            contract_address: None,
            storage_dir: PathBuf::from("./.drearl"),
        }
    }
}
