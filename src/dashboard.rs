//! Dashboard view-model
//!
//! Merges the stored session, the local inventory and the contract reads into
//! the searchable list the dashboard renders, and drives the add/edit/delete
//! and details flows.

use std::collections::HashSet;

use thiserror::Error;

use crate::asset::{Asset, AssetId};
use crate::chain::{ChainFacade, RealEstateContract};
use crate::coordinator::{Modal, ModalHandle};
use crate::error::{ChainError, ChainReadError, DrearlError};
use crate::forms::{AssetForm, FieldErrors};
use crate::inventory::{AssetDraft, AssetInventory, AssetPatch};
use crate::routes::Route;
use crate::session::{Role, Session};

/// State of the dashboard's chain read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadState {
    Pending,
    Ready(Vec<Asset>),
    Failed(ChainReadError),
}

/// Where a refresh reads from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    Owner(String),
    AllListings,
}

/// Identifies one refresh; results for an outdated ticket are dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTicket {
    generation: u64,
    role: Role,
    source: AssetSource,
}

impl RefreshTicket {
    pub fn source(&self) -> &AssetSource {
        &self.source
    }
}

/// Add/edit submission failure
#[derive(Error, Debug)]
pub enum SubmitError {
    /// The form stays open with these messages
    #[error("{} field(s) need attention", .0.len())]
    Invalid(FieldErrors),

    #[error(transparent)]
    Failed(#[from] DrearlError),
}

pub struct Dashboard {
    session: Option<Session>,
    inventory: AssetInventory,
    role: Role,
    query: String,
    read: ReadState,
    generation: u64,
    torn_down: bool,
    modals: ModalHandle,
    pending_delete: Option<AssetId>,
    selected: Option<AssetId>,
    editing: Option<AssetId>,
}

impl Dashboard {
    /// `modals` is normally [`AppCoordinator::modal_handle`](crate::AppCoordinator::modal_handle)
    pub fn new(
        session: Option<Session>,
        inventory: AssetInventory,
        modals: ModalHandle,
    ) -> Self {
        let role = session
            .as_ref()
            .map(Session::effective_role)
            .unwrap_or(Role::Buyer);
        Self {
            session,
            inventory,
            role,
            query: String::new(),
            read: ReadState::Pending,
            generation: 0,
            torn_down: false,
            modals,
            pending_delete: None,
            selected: None,
            editing: None,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Switch the viewing role; the stored session is untouched
    ///
    /// Any refresh in flight for the old role becomes stale.
    pub fn set_role(&mut self, role: Role) {
        if role != self.role {
            log::debug!("Dashboard role switched to {}", role);
            self.role = role;
            self.generation += 1;
            self.read = ReadState::Pending;
        }
    }

    pub fn read_state(&self) -> &ReadState {
        &self.read
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.read, ReadState::Pending)
    }

    pub fn is_open(&self, modal: Modal) -> bool {
        self.modals.is_open(modal)
    }

    // ============================================================================
    // Loading
    // ============================================================================

    /// Start a refresh for the current role
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.generation += 1;
        self.read = ReadState::Pending;

        let source = match self.role {
            Role::Landowner => AssetSource::Owner(
                self.session
                    .as_ref()
                    .map(|s| s.wallet_address.clone())
                    .unwrap_or_default(),
            ),
            Role::Buyer => AssetSource::AllListings,
        };
        RefreshTicket {
            generation: self.generation,
            role: self.role,
            source,
        }
    }

    /// Apply a finished read; returns false when the result was discarded
    pub fn apply(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Vec<Asset>, ChainReadError>,
    ) -> bool {
        if self.torn_down || ticket.generation != self.generation {
            log::debug!(
                "Discarding stale dashboard read (generation {}, current {})",
                ticket.generation,
                self.generation
            );
            return false;
        }

        self.read = match result {
            Ok(chain) if ticket.role == Role::Landowner => ReadState::Ready(self.merge_local(chain)),
            Ok(chain) => ReadState::Ready(chain),
            Err(e) => {
                log::warn!("Dashboard read failed: {}", e);
                ReadState::Failed(e)
            }
        };
        true
    }

    /// Read from the contract for the current role and apply the result
    pub async fn refresh<C: RealEstateContract>(&mut self, facade: &ChainFacade<C>) -> bool {
        let ticket = self.begin_refresh();
        let result = fetch(facade, ticket.source()).await;
        self.apply(ticket, result)
    }

    /// The view is gone; every outstanding read is discarded
    pub fn teardown(&mut self) {
        self.torn_down = true;
    }

    /// Owner's chain assets followed by local records not yet on chain
    fn merge_local(&self, mut chain: Vec<Asset>) -> Vec<Asset> {
        let Some(name) = self.full_name() else {
            return chain;
        };
        let on_chain: HashSet<AssetId> = chain.iter().map(|asset| asset.id).collect();
        chain.extend(
            self.inventory
                .list()
                .into_iter()
                .filter(|asset| asset.owner == name && !on_chain.contains(&asset.id)),
        );
        chain
    }

    // ============================================================================
    // Listing
    // ============================================================================

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Loaded assets matching the current query
    pub fn visible_assets(&self) -> Vec<&Asset> {
        let needle = self.query.to_lowercase();
        self.loaded()
            .iter()
            .filter(|asset| asset.matches_search(&needle))
            .collect()
    }

    /// Whether the current user may edit or delete the asset
    pub fn can_manage(&self, asset: &Asset) -> bool {
        self.role == Role::Landowner && self.full_name() == Some(asset.owner.as_str())
    }

    fn loaded(&self) -> &[Asset] {
        match &self.read {
            ReadState::Ready(assets) => assets,
            _ => &[],
        }
    }

    fn find(&self, id: AssetId) -> Option<&Asset> {
        self.loaded().iter().find(|asset| asset.id == id)
    }

    fn full_name(&self) -> Option<&str> {
        self.session.as_ref().and_then(Session::full_name)
    }

    // ============================================================================
    // Delete flow
    // ============================================================================

    /// Ask for confirmation before deleting; ignored for assets the user can't manage
    pub fn request_delete(&mut self, id: AssetId) -> bool {
        match self.find(id) {
            Some(asset) if self.can_manage(asset) => {
                self.pending_delete = Some(id);
                self.modals.set(Modal::DeleteConfirm, true);
                true
            }
            _ => false,
        }
    }

    pub fn pending_delete(&self) -> Option<AssetId> {
        self.pending_delete
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.modals.set(Modal::DeleteConfirm, false);
    }

    /// Drop the asset from the local inventory, then from the list (never the contract)
    ///
    /// On a storage error nothing changes and the confirmation stays open.
    pub fn confirm_delete(&mut self) -> Result<Option<AssetId>, DrearlError> {
        let Some(id) = self.pending_delete else {
            return Ok(None);
        };
        self.inventory.remove(id)?;

        self.pending_delete = None;
        self.modals.set(Modal::DeleteConfirm, false);
        if let ReadState::Ready(assets) = &mut self.read {
            assets.retain(|asset| asset.id != id);
        }
        log::info!("Asset {} deleted from dashboard", id);
        Ok(Some(id))
    }

    // ============================================================================
    // Details flow
    // ============================================================================

    pub fn view_details(&mut self, id: AssetId) -> Option<&Asset> {
        if self.find(id).is_none() {
            return None;
        }
        self.selected = Some(id);
        self.modals.set(Modal::AssetDetails, true);
        self.find(id)
    }

    pub fn selected_asset(&self) -> Option<&Asset> {
        self.selected.and_then(|id| self.find(id))
    }

    pub fn close_details(&mut self) {
        self.selected = None;
        self.modals.set(Modal::AssetDetails, false);
    }

    /// Navigation to the purchase page; only the id travels
    pub fn purchase_route(&self, id: AssetId) -> Route {
        Route::BuyProperty { asset_id: id }
    }

    // ============================================================================
    // Add / edit
    // ============================================================================

    pub fn open_add_asset(&mut self) {
        self.editing = None;
        self.modals.set(Modal::AddProperty, true);
    }

    pub fn close_add_asset(&mut self) {
        self.editing = None;
        self.modals.set(Modal::AddProperty, false);
    }

    pub fn editing(&self) -> Option<AssetId> {
        self.editing
    }

    /// Validate and store a new asset owned by the registered landowner
    pub fn add_asset(&mut self, form: &AssetForm) -> Result<Asset, SubmitError> {
        let owner = self
            .full_name()
            .map(str::to_string)
            .ok_or(DrearlError::NotConnected)?;
        if self.role != Role::Landowner {
            let reason = "only landowners can add assets".to_string();
            return Err(DrearlError::NotPermitted(reason).into());
        }
        let details = form.validate().map_err(SubmitError::Invalid)?;

        let asset = self.inventory.append(AssetDraft {
            id: None,
            details,
            owner,
            image_ref: form.image_ref.clone(),
        })?;

        if let ReadState::Ready(assets) = &mut self.read {
            assets.push(asset.clone());
        }
        self.close_add_asset();
        Ok(asset)
    }

    /// Open the asset modal pre-filled with a locally stored asset
    ///
    /// Chain-only assets have no local record to update and are `AssetNotFound`.
    pub fn edit(&mut self, id: AssetId) -> Result<AssetForm, DrearlError> {
        let asset = self.managed_record(id)?;
        self.editing = Some(id);
        self.modals.set(Modal::AddProperty, true);
        Ok(AssetForm::from_asset(&asset))
    }

    /// Apply an edited form to the stored asset
    pub fn save_edit(&mut self, id: AssetId, form: &AssetForm) -> Result<Asset, SubmitError> {
        self.managed_record(id)?;
        let details = form.validate().map_err(SubmitError::Invalid)?;
        let updated = self.inventory.update(
            id,
            AssetPatch {
                details: Some(details),
                image_ref: Some(form.image_ref.clone()),
                for_sale: None,
            },
        )?;

        if let ReadState::Ready(assets) = &mut self.read {
            if let Some(slot) = assets.iter_mut().find(|asset| asset.id == id) {
                *slot = updated.clone();
            }
        }
        self.close_add_asset();
        Ok(updated)
    }

    fn managed_record(&self, id: AssetId) -> Result<Asset, DrearlError> {
        let asset = self.inventory.get(id).ok_or(DrearlError::AssetNotFound(id))?;
        if !self.can_manage(&asset) {
            log::warn!("Refusing to edit asset {} owned by {}", id, asset.owner);
            return Err(DrearlError::NotPermitted(format!(
                "asset {} belongs to another owner",
                id
            )));
        }
        Ok(asset)
    }
}

async fn fetch<C: RealEstateContract>(
    facade: &ChainFacade<C>,
    source: &AssetSource,
) -> Result<Vec<Asset>, ChainReadError> {
    match source {
        AssetSource::Owner(account) if account.is_empty() => Err(ChainReadError {
            operation: "viewOwnerRealEstates",
            source: ChainError::Aborted("session has no wallet address".to_string()),
        }),
        AssetSource::Owner(account) => facade.list_owner_assets(account).await,
        AssetSource::AllListings => facade.list_all_assets().await,
    }
}
