//! On-chain read/write facade
//!
//! - Contract seam (`RealEstateContract`)
//! - HTTP gateway client
//! - Facade with typed read errors and fire-and-forget purchases

mod client;
mod facade;
#[cfg(test)]
pub(crate) mod testing;

pub use client::GatewayClient;
pub use facade::{ChainFacade, PendingPurchase};

use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::asset::{Asset, AssetId};
use crate::error::ChainError;

/// Arguments of the contract's `buyRealEstate` entry point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub id: AssetId,
    /// Current owner as recorded on the asset
    pub owner_id: String,
    /// Buyer's wallet address (the transaction sender)
    pub buyer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseStatus {
    /// Accepted by the gateway, not yet final on chain
    Pending,
    Confirmed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseReceipt {
    pub tx_hash: String,
    pub status: PurchaseStatus,
}

/// The external real-estate contract
///
/// Mirrors the contract ABI: two views and one write. Consistency and
/// finality are the contract's business, not this crate's.
pub trait RealEstateContract: Send + Sync + 'static {
    /// `viewOwnerRealEstates(account)`
    fn view_owner_real_estates(
        &self,
        account: &str,
    ) -> impl Future<Output = Result<Vec<Asset>, ChainError>> + Send;

    /// `viewAllRealEstateListings()`
    fn view_all_real_estate_listings(
        &self,
    ) -> impl Future<Output = Result<Vec<Asset>, ChainError>> + Send;

    /// `buyRealEstate(id, ownerId)` sent from `buyer`
    fn buy_real_estate(
        &self,
        request: PurchaseRequest,
    ) -> impl Future<Output = Result<PurchaseReceipt, ChainError>> + Send;
}
