//! Buy-property page
//!
//! The page receives only an asset id and re-reads the asset, so a purchase
//! always targets the current record rather than whatever the previous page
//! rendered.

use crate::asset::{Asset, AssetId};
use crate::chain::{ChainFacade, PendingPurchase, RealEstateContract};
use crate::error::DrearlError;
use crate::inventory::AssetInventory;
use crate::routes::Route;
use crate::wallet::WalletProvider;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchasePage {
    asset: Asset,
}

impl PurchasePage {
    /// Look the routed asset up: global listing first, local inventory second
    pub async fn resolve<C: RealEstateContract>(
        route: &Route,
        facade: &ChainFacade<C>,
        inventory: &AssetInventory,
    ) -> Result<Self, DrearlError> {
        let Route::BuyProperty { asset_id } = *route else {
            return Err(DrearlError::InvalidRoute(route.path()));
        };

        let listed = match facade.list_all_assets().await {
            Ok(listings) => listings.into_iter().find(|asset| asset.id == asset_id),
            Err(e) => {
                log::warn!("Listing read failed, trying local inventory: {}", e);
                return inventory
                    .get(asset_id)
                    .map(|asset| Self { asset })
                    .ok_or(DrearlError::ChainRead(e));
            }
        };

        listed
            .or_else(|| inventory.get(asset_id))
            .map(|asset| Self { asset })
            .ok_or(DrearlError::AssetNotFound(asset_id))
    }

    pub fn asset(&self) -> &Asset {
        &self.asset
    }

    pub fn asset_id(&self) -> AssetId {
        self.asset.id
    }

    /// Dispatch the purchase from the connected wallet
    ///
    /// Returns as soon as the write is dispatched; the asset may still show
    /// as for sale until the chain confirms.
    pub fn confirm<C: RealEstateContract>(
        &self,
        wallet: &dyn WalletProvider,
        facade: &ChainFacade<C>,
    ) -> Result<PendingPurchase, DrearlError> {
        let buyer = wallet.address().ok_or(DrearlError::NotConnected)?;
        facade.purchase(self.asset.id, self.asset.owner.clone(), buyer)
    }
}
