//! Error types for the Drearl marketplace client
//!
//! Storage failures degrade to "absent" at the store boundary; the variants
//! here are what callers see when an operation genuinely cannot proceed.

use thiserror::Error;

/// Failures of the durable client storage medium
#[derive(Error, Debug)]
pub enum StorageError {
    /// Medium is inaccessible (disabled by the host, directory unusable)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures talking to the contract gateway
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("Gateway transport error: {0}")]
    Transport(String),

    #[error("Gateway returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Could not decode gateway response: {0}")]
    Decode(String),

    /// The dispatched write task was dropped before it reported back
    #[error("Write task aborted: {0}")]
    Aborted(String),
}

/// A failed on-chain read, kept distinct from an empty result
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Chain read '{operation}' failed: {source}")]
pub struct ChainReadError {
    pub operation: &'static str,
    #[source]
    pub source: ChainError,
}

/// Top-level error taxonomy for marketplace operations
#[derive(Error, Debug)]
pub enum DrearlError {
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Malformed stored data under '{key}': {reason}")]
    MalformedStoredData { key: String, reason: String },

    #[error(transparent)]
    ChainRead(#[from] ChainReadError),

    #[error("Chain write failed: {0}")]
    ChainWrite(ChainError),

    /// An operation needed a wallet address and none was available
    #[error("Wallet not connected")]
    NotConnected,

    #[error("Asset not found: {0}")]
    AssetNotFound(u64),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Invalid asset update: {0}")]
    InvalidUpdate(String),

    #[error("Not a purchase route: {0}")]
    InvalidRoute(String),

    /// The current user may not change this asset
    #[error("Not permitted: {0}")]
    NotPermitted(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<StorageError> for DrearlError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Json(e) => DrearlError::MalformedStoredData {
                key: "<unknown>".to_string(),
                reason: e.to_string(),
            },
            other => DrearlError::StorageUnavailable(other.to_string()),
        }
    }
}

impl DrearlError {
    /// Create a malformed-data error for a storage key
    pub fn malformed(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedStoredData {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Whether the caller should prompt the user to (re)connect a wallet
    pub fn needs_wallet(&self) -> bool {
        matches!(self, Self::NotConnected)
    }
}
