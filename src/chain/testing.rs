use std::sync::Mutex;

use super::{PurchaseReceipt, PurchaseRequest, PurchaseStatus, RealEstateContract};
use crate::asset::Asset;
use crate::error::ChainError;

/// In-process contract with scripted responses
#[derive(Default)]
pub(crate) struct ScriptedContract {
    pub listings: Vec<Asset>,
    pub owned: Vec<Asset>,
    pub fail_reads: bool,
    pub purchases: Mutex<Vec<PurchaseRequest>>,
}

impl ScriptedContract {
    pub fn listing(listings: Vec<Asset>) -> Self {
        Self {
            listings,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_reads: true,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<PurchaseRequest> {
        self.purchases.lock().unwrap().clone()
    }
}

impl RealEstateContract for ScriptedContract {
    async fn view_owner_real_estates(&self, _account: &str) -> Result<Vec<Asset>, ChainError> {
        if self.fail_reads {
            return Err(ChainError::Transport("connection refused".to_string()));
        }
        Ok(self.owned.clone())
    }

    async fn view_all_real_estate_listings(&self) -> Result<Vec<Asset>, ChainError> {
        if self.fail_reads {
            return Err(ChainError::Status {
                status: 500,
                body: "boom".to_string(),
            });
        }
        Ok(self.listings.clone())
    }

    async fn buy_real_estate(&self, request: PurchaseRequest) -> Result<PurchaseReceipt, ChainError> {
        self.purchases.lock().unwrap().push(request);
        Ok(PurchaseReceipt {
            tx_hash: "0xfeed".to_string(),
            status: PurchaseStatus::Pending,
        })
    }
}
