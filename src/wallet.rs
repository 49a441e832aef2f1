//! Wallet connection status as seen by the marketplace
//!
//! The connection lifecycle belongs to the external wallet library; this
//! crate only reads the status and the active account.

use std::sync::RwLock;

pub trait WalletProvider: Send + Sync {
    fn is_connected(&self) -> bool;

    /// Active account address, `None` when disconnected
    fn address(&self) -> Option<String>;
}

/// Wallet state pushed in by the host (wallet events, tests)
#[derive(Debug, Default)]
pub struct StaticWallet {
    address: RwLock<Option<String>>,
}

impl StaticWallet {
    pub fn disconnected() -> Self {
        Self::default()
    }

    pub fn connected(address: impl Into<String>) -> Self {
        Self {
            address: RwLock::new(Some(address.into())),
        }
    }

    pub fn connect(&self, address: impl Into<String>) {
        let address = address.into();
        log::debug!("Wallet connected: {}", address);
        if let Ok(mut slot) = self.address.write() {
            *slot = Some(address);
        }
    }

    pub fn disconnect(&self) {
        log::debug!("Wallet disconnected");
        if let Ok(mut slot) = self.address.write() {
            *slot = None;
        }
    }
}

impl WalletProvider for StaticWallet {
    fn is_connected(&self) -> bool {
        self.address().is_some()
    }

    fn address(&self) -> Option<String> {
        self.address
            .read()
            .ok()
            .and_then(|slot| slot.clone())
            .filter(|address| !address.is_empty())
    }
}
