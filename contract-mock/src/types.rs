//! Gateway wire types
//!
//! Assets are stored as the client sends them; the mock only looks at the
//! fields it needs to move ownership around.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Asset record as listed on the contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedAsset {
    pub id: u64,
    #[serde(default)]
    pub owner: String,
    #[serde(default = "listed_for_sale")]
    pub for_sale: bool,
    /// Kind tag and kind-specific fields, passed through untouched
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

fn listed_for_sale() -> bool {
    true
}

/// An asset together with the account that holds it on chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub account: String,
    pub asset: ListedAsset,
}

/// POST /purchases body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub id: u64,
    pub owner_id: String,
    pub buyer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Pending,
    Confirmed,
}

/// POST /purchases response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResponse {
    pub tx_hash: String,
    pub status: TxStatus,
}

/// POST /dev/confirm response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmResponse {
    pub confirmed: Vec<String>,
    /// Pending purchases dropped because the asset changed hands first
    pub rejected: Vec<String>,
}

/// Optional `?contract=` selector sent by clients; the mock serves one contract
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContractQuery {
    pub contract: Option<String>,
}
