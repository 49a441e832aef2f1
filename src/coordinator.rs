//! Application state coordinator
//!
//! Sequences the onboarding flow: connect wallet, pick a role, register,
//! land on the dashboard. Views hold a reference to one `AppCoordinator`
//! and call its methods; there is no ambient global.

use std::sync::{Arc, PoisonError, RwLock};

use crate::error::DrearlError;
use crate::routes::Route;
use crate::session::{RegistrationDetails, Role, Session, SessionStore};
use crate::wallet::WalletProvider;

/// Modals the coordinator tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modal {
    Connect,
    RoleSelect,
    Registration,
    AddProperty,
    AssetDetails,
    DeleteConfirm,
}

/// Independent visibility flags; several may be open at once
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModalVisibility {
    pub connect: bool,
    pub role_select: bool,
    pub registration: bool,
    pub add_property: bool,
    pub asset_details: bool,
    pub delete_confirm: bool,
}

impl ModalVisibility {
    pub fn is_open(&self, modal: Modal) -> bool {
        match modal {
            Modal::Connect => self.connect,
            Modal::RoleSelect => self.role_select,
            Modal::Registration => self.registration,
            Modal::AddProperty => self.add_property,
            Modal::AssetDetails => self.asset_details,
            Modal::DeleteConfirm => self.delete_confirm,
        }
    }

    pub fn set(&mut self, modal: Modal, open: bool) {
        let flag = match modal {
            Modal::Connect => &mut self.connect,
            Modal::RoleSelect => &mut self.role_select,
            Modal::Registration => &mut self.registration,
            Modal::AddProperty => &mut self.add_property,
            Modal::AssetDetails => &mut self.asset_details,
            Modal::DeleteConfirm => &mut self.delete_confirm,
        };
        *flag = open;
    }

    pub fn open_modals(&self) -> Vec<Modal> {
        [
            Modal::Connect,
            Modal::RoleSelect,
            Modal::Registration,
            Modal::AddProperty,
            Modal::AssetDetails,
            Modal::DeleteConfirm,
        ]
        .into_iter()
        .filter(|modal| self.is_open(*modal))
        .collect()
    }
}

/// Modal flags shared by the coordinator and the dashboard
///
/// Clones point at the same flags, so a modal opened by one view is seen by
/// every other holder of the handle.
#[derive(Debug, Clone, Default)]
pub struct ModalHandle(Arc<RwLock<ModalVisibility>>);

impl ModalHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ModalVisibility {
        *self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_open(&self, modal: Modal) -> bool {
        self.snapshot().is_open(modal)
    }

    pub fn set(&self, modal: Modal, open: bool) {
        log::debug!("Modal {:?} -> {}", modal, if open { "open" } else { "closed" });
        self.0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set(modal, open);
    }
}

/// Onboarding progress; there is no way back to `Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowPhase {
    Idle,
    ConnectPrompted,
    /// Role recorded, registration form showing
    RoleChosen,
    /// Registration submitted and not yet saved (stays here after a failed save)
    Registering,
    Active,
}

pub struct AppCoordinator {
    wallet: Arc<dyn WalletProvider>,
    sessions: SessionStore,
    role: Option<Role>,
    modals: ModalHandle,
    phase: FlowPhase,
    pending_navigation: Option<Route>,
}

impl AppCoordinator {
    pub fn new(wallet: Arc<dyn WalletProvider>, sessions: SessionStore) -> Self {
        Self {
            wallet,
            sessions,
            role: None,
            modals: ModalHandle::new(),
            phase: FlowPhase::Idle,
            pending_navigation: None,
        }
    }

    // ============================================================================
    // Read-only state
    // ============================================================================

    pub fn is_wallet_connected(&self) -> bool {
        self.wallet.is_connected()
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn phase(&self) -> FlowPhase {
        self.phase
    }

    pub fn modals(&self) -> ModalVisibility {
        self.modals.snapshot()
    }

    /// Handle for views that drive their own modals (dashboard)
    pub fn modal_handle(&self) -> ModalHandle {
        self.modals.clone()
    }

    pub fn is_open(&self, modal: Modal) -> bool {
        self.modals.is_open(modal)
    }

    /// Navigation requested by the last transition, consumed by the host
    pub fn take_navigation(&mut self) -> Option<Route> {
        self.pending_navigation.take()
    }

    // ============================================================================
    // Setters
    // ============================================================================

    pub fn set_role(&mut self, role: Option<Role>) {
        self.role = role;
    }

    pub fn set_modal(&mut self, modal: Modal, open: bool) {
        self.modals.set(modal, open);
    }

    pub fn open(&mut self, modal: Modal) {
        self.set_modal(modal, true);
    }

    pub fn close(&mut self, modal: Modal) {
        self.set_modal(modal, false);
    }

    // ============================================================================
    // Orchestration
    // ============================================================================

    /// Open the connect-wallet modal
    pub fn handle_get_started(&mut self) {
        self.open(Modal::Connect);
        if self.phase == FlowPhase::Idle {
            self.phase = FlowPhase::ConnectPrompted;
        }
    }

    /// Wallet library reported a connection while the connect prompt was up
    pub fn on_wallet_connected(&mut self) {
        if !self.wallet.is_connected() || !self.modals.is_open(Modal::Connect) {
            return;
        }
        log::info!("Wallet connected, asking for a role");
        self.close(Modal::Connect);
        self.open(Modal::RoleSelect);
    }

    /// Record the chosen role and move on to registration
    pub fn handle_role_select(&mut self, role: Role) {
        log::info!("Role selected: {}", role);
        self.role = Some(role);
        self.close(Modal::RoleSelect);
        self.open(Modal::Registration);
        if self.phase != FlowPhase::Active {
            self.phase = FlowPhase::RoleChosen;
        }
    }

    /// Persist the session for the connected wallet and head to the dashboard
    ///
    /// Without a wallet address nothing is stored: the connect prompt is
    /// reopened and `NotConnected` returned. A storage failure keeps the
    /// registration modal open so the user can retry.
    pub fn handle_registration_success(
        &mut self,
        details: RegistrationDetails,
    ) -> Result<Route, DrearlError> {
        if self.phase != FlowPhase::Active {
            self.phase = FlowPhase::Registering;
        }
        let Some(address) = self.wallet.address() else {
            log::warn!("Registration submitted without a connected wallet");
            self.open(Modal::Connect);
            return Err(DrearlError::NotConnected);
        };

        let session = Session::new(address, self.role, details);
        self.sessions.save(&session)?;

        self.close(Modal::Registration);
        self.phase = FlowPhase::Active;
        self.pending_navigation = Some(Route::Dashboard);
        log::info!("Registration complete, navigating to {}", Route::Dashboard.path());
        Ok(Route::Dashboard)
    }
}
