//! In-memory contract registry

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;

use crate::types::{ConfirmResponse, Holding, ListedAsset, PurchaseRequest, PurchaseResponse, TxStatus};

pub type SharedRegistry = Arc<RwLock<Registry>>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Asset {0} is not listed")]
    UnknownAsset(u64),

    #[error("Asset {0} is not for sale")]
    NotForSale(u64),

    #[error("Asset {id} is owned by '{actual}', not '{claimed}'")]
    OwnerMismatch {
        id: u64,
        claimed: String,
        actual: String,
    },

    #[error("Asset {0} is already listed")]
    Duplicate(u64),
}

#[derive(Debug, Clone)]
struct PendingTx {
    tx_hash: String,
    request: PurchaseRequest,
}

/// Listings plus purchases waiting for confirmation
#[derive(Debug, Default)]
pub struct Registry {
    holdings: Vec<Holding>,
    pending: Vec<PendingTx>,
    tx_counter: u64,
    last_contract: Option<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(self) -> SharedRegistry {
        Arc::new(RwLock::new(self))
    }

    /// Load holdings from a JSON array of `{account, asset}`
    pub fn from_seed_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let holdings: Vec<Holding> = serde_json::from_str(&raw)?;
        let mut registry = Self::new();
        for holding in holdings {
            registry.list(holding)?;
        }
        log::info!(
            "Seeded {} listing(s) from {}",
            registry.holdings.len(),
            path.display()
        );
        Ok(registry)
    }

    pub fn list(&mut self, holding: Holding) -> Result<(), RegistryError> {
        if self.find(holding.asset.id).is_some() {
            return Err(RegistryError::Duplicate(holding.asset.id));
        }
        log::info!(
            "Listed asset {} for account {}",
            holding.asset.id,
            holding.account
        );
        self.holdings.push(holding);
        Ok(())
    }

    /// Every asset currently for sale
    pub fn all_listings(&self) -> Vec<ListedAsset> {
        self.holdings
            .iter()
            .filter(|h| h.asset.for_sale)
            .map(|h| h.asset.clone())
            .collect()
    }

    /// Every asset held by `account`, for sale or not
    pub fn owned_by(&self, account: &str) -> Vec<ListedAsset> {
        self.holdings
            .iter()
            .filter(|h| h.account.eq_ignore_ascii_case(account))
            .map(|h| h.asset.clone())
            .collect()
    }

    /// Accept a purchase; it takes effect on the next `confirm_pending`
    pub fn submit_purchase(
        &mut self,
        request: PurchaseRequest,
    ) -> Result<PurchaseResponse, RegistryError> {
        let holding = self
            .find(request.id)
            .ok_or(RegistryError::UnknownAsset(request.id))?;
        if !holding.asset.for_sale {
            return Err(RegistryError::NotForSale(request.id));
        }
        if holding.asset.owner != request.owner_id {
            return Err(RegistryError::OwnerMismatch {
                id: request.id,
                claimed: request.owner_id,
                actual: holding.asset.owner.clone(),
            });
        }

        self.tx_counter += 1;
        let tx_hash = format!("0x{:064x}", self.tx_counter);
        log::info!(
            "Purchase of asset {} by {} pending as {}",
            request.id,
            request.buyer,
            tx_hash
        );
        self.pending.push(PendingTx {
            tx_hash: tx_hash.clone(),
            request,
        });

        Ok(PurchaseResponse {
            tx_hash,
            status: TxStatus::Pending,
        })
    }

    /// Apply pending purchases in submission order
    ///
    /// The first purchase of an asset wins; later ones for the same asset
    /// are rejected because it is no longer for sale.
    pub fn confirm_pending(&mut self) -> ConfirmResponse {
        let mut response = ConfirmResponse::default();
        for tx in std::mem::take(&mut self.pending) {
            let Some(holding) = self
                .holdings
                .iter_mut()
                .find(|h| h.asset.id == tx.request.id && h.asset.for_sale)
            else {
                log::warn!("Rejecting {}: asset {} changed hands", tx.tx_hash, tx.request.id);
                response.rejected.push(tx.tx_hash);
                continue;
            };

            holding.account = tx.request.buyer.clone();
            holding.asset.owner = tx.request.buyer;
            holding.asset.for_sale = false;
            log::info!("Confirmed {}: asset {} -> {}", tx.tx_hash, holding.asset.id, holding.account);
            response.confirmed.push(tx.tx_hash);
        }
        response
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Remember the `contract` selector of the latest contract call
    pub fn record_contract(&mut self, contract: Option<String>) {
        self.last_contract = contract;
    }

    pub fn last_contract(&self) -> Option<&str> {
        self.last_contract.as_deref()
    }

    fn find(&self, id: u64) -> Option<&Holding> {
        self.holdings.iter().find(|h| h.asset.id == id)
    }
}
