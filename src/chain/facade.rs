use std::sync::Arc;
use tokio::task::JoinHandle;

use super::{PurchaseReceipt, PurchaseRequest, RealEstateContract};
use crate::asset::{Asset, AssetId};
use crate::error::{ChainError, ChainReadError, DrearlError};

/// Typed wrapper around the contract's reads and its single write
///
/// Read failures come back as [`ChainReadError`], never as an empty list.
/// `purchase` only dispatches the write; a listing read right after it may
/// still show the asset for sale until the chain confirms.
pub struct ChainFacade<C> {
    contract: Arc<C>,
}

impl<C> Clone for ChainFacade<C> {
    fn clone(&self) -> Self {
        Self {
            contract: Arc::clone(&self.contract),
        }
    }
}

impl<C: RealEstateContract> ChainFacade<C> {
    pub fn new(contract: C) -> Self {
        Self {
            contract: Arc::new(contract),
        }
    }

    pub fn contract(&self) -> &C {
        &self.contract
    }

    /// Assets owned by `account`
    pub async fn list_owner_assets(&self, account: &str) -> Result<Vec<Asset>, ChainReadError> {
        self.contract
            .view_owner_real_estates(account)
            .await
            .map_err(|source| {
                log::warn!("Owner listing read failed for {}: {}", account, source);
                ChainReadError {
                    operation: "viewOwnerRealEstates",
                    source,
                }
            })
    }

    /// Every listing on the marketplace
    pub async fn list_all_assets(&self) -> Result<Vec<Asset>, ChainReadError> {
        self.contract
            .view_all_real_estate_listings()
            .await
            .map_err(|source| {
                log::warn!("Global listing read failed: {}", source);
                ChainReadError {
                    operation: "viewAllRealEstateListings",
                    source,
                }
            })
    }

    /// Dispatch `buyRealEstate` and return without waiting for it
    ///
    /// Must be called from within a tokio runtime.
    pub fn purchase(
        &self,
        asset_id: AssetId,
        owner_id: impl Into<String>,
        buyer: impl Into<String>,
    ) -> Result<PendingPurchase, DrearlError> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
            DrearlError::ChainWrite(ChainError::Transport(format!("no async runtime: {}", e)))
        })?;

        let request = PurchaseRequest {
            id: asset_id,
            owner_id: owner_id.into(),
            buyer: buyer.into(),
        };
        log::info!(
            "Dispatching purchase of asset {} for {}",
            request.id,
            request.buyer
        );

        let contract = Arc::clone(&self.contract);
        let handle = runtime.spawn(async move {
            let result = contract.buy_real_estate(request).await;
            if let Err(ref e) = result {
                log::error!("Purchase dispatch failed: {}", e);
            }
            result
        });

        Ok(PendingPurchase { asset_id, handle })
    }
}

/// A dispatched purchase whose outcome nobody has to wait for
#[derive(Debug)]
pub struct PendingPurchase {
    asset_id: AssetId,
    handle: JoinHandle<Result<PurchaseReceipt, ChainError>>,
}

impl PendingPurchase {
    pub fn asset_id(&self) -> AssetId {
        self.asset_id
    }

    /// Whether the gateway has answered yet (says nothing about finality)
    pub fn is_dispatched(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the gateway's answer to the write
    pub async fn outcome(self) -> Result<PurchaseReceipt, DrearlError> {
        match self.handle.await {
            Ok(result) => result.map_err(DrearlError::ChainWrite),
            Err(join_err) => Err(DrearlError::ChainWrite(ChainError::Aborted(
                join_err.to_string(),
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{AssetDetails, PropertyDetails};
    use crate::chain::testing::ScriptedContract;
    use crate::chain::PurchaseStatus;

    fn villa() -> Asset {
        Asset {
            id: 5,
            details: AssetDetails::Property(PropertyDetails {
                name: Some("Sunset Villa".to_string()),
                ..Default::default()
            }),
            is_verified: true,
            for_sale: true,
            owner: "Ada".to_string(),
            image_ref: None,
        }
    }

    #[tokio::test]
    async fn test_empty_listing_is_not_an_error() {
        let facade = ChainFacade::new(ScriptedContract::default());
        assert_eq!(facade.list_all_assets().await.unwrap(), Vec::new());
    }

    #[tokio::test]
    async fn test_read_failure_is_distinguishable() {
        let facade = ChainFacade::new(ScriptedContract::failing());

        let err = facade.list_all_assets().await.unwrap_err();
        assert_eq!(err.operation, "viewAllRealEstateListings");

        let err = facade.list_owner_assets("0xabc").await.unwrap_err();
        assert_eq!(err.operation, "viewOwnerRealEstates");
        assert!(matches!(err.source, ChainError::Transport(_)));
    }

    #[tokio::test]
    async fn test_purchase_dispatches_request() {
        let facade = ChainFacade::new(ScriptedContract::listing(vec![villa()]));

        let pending = facade.purchase(5, "Ada", "0xbuyer").unwrap();
        assert_eq!(pending.asset_id(), 5);

        let receipt = pending.outcome().await.unwrap();
        assert_eq!(receipt.status, PurchaseStatus::Pending);

        assert_eq!(
            facade.contract().sent(),
            vec![PurchaseRequest {
                id: 5,
                owner_id: "Ada".to_string(),
                buyer: "0xbuyer".to_string(),
            }]
        );
    }

    #[test]
    fn test_purchase_outside_runtime_fails() {
        let facade = ChainFacade::new(ScriptedContract::default());
        assert!(matches!(
            facade.purchase(1, "Ada", "0xbuyer"),
            Err(DrearlError::ChainWrite(_))
        ));
    }
}
