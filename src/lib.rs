//! Drearl: client-side state for a wallet-gated real-estate marketplace
//!
//! This crate holds the state layer behind the Drearl front-end: the
//! onboarding flow, the locally persisted session and asset inventory, and
//! a typed facade over the external real-estate contract.
//!
//! # Architecture
//!
//! - **Storage**: `ClientStorage` key/value medium (file-backed or in-memory)
//! - **Session / Inventory**: the `userData` and `assets` records
//! - **Chain facade**: contract reads with typed errors, fire-and-forget purchases
//! - **Coordinator**: connect wallet → select role → register → dashboard
//! - **Dashboard**: merged, searchable asset list with add/edit/delete flows
//!
//! # Example
//!
//! ```ignore
//! use drearl::{AppCoordinator, MarketplaceConfig, Role, SessionStore, StaticWallet};
//!
//! let config = MarketplaceConfig::from_env();
//! let storage = Arc::new(FileStorage::new_with_base_dir(config.storage_dir.clone()));
//! let wallet = Arc::new(StaticWallet::connected("0xabc"));
//!
//! let mut app = AppCoordinator::new(wallet, SessionStore::new(storage));
//! app.handle_get_started();
//! app.on_wallet_connected();
//! app.handle_role_select(Role::Landowner);
//! let route = app.handle_registration_success(details)?;
//! ```

// Public modules
pub mod asset;
pub mod chain;
pub mod config;
pub mod coordinator;
pub mod dashboard;
pub mod error;
pub mod forms;
pub mod inventory;
pub mod purchase;
pub mod routes;
pub mod session;
pub mod storage;
pub mod wallet;

// Re-exports for convenience
pub use asset::{Asset, AssetDetails, AssetId, AssetKind, LandDetails, PropertyDetails};
pub use chain::{
    ChainFacade, GatewayClient, PendingPurchase, PurchaseReceipt, PurchaseRequest,
    PurchaseStatus, RealEstateContract,
};
pub use config::{MarketplaceConfig, Network};
pub use coordinator::{AppCoordinator, FlowPhase, Modal, ModalHandle, ModalVisibility};
pub use dashboard::{AssetSource, Dashboard, ReadState, RefreshTicket, SubmitError};
pub use error::{ChainError, ChainReadError, DrearlError, StorageError};
pub use forms::{validate_registration, AssetForm, FieldErrors};
pub use inventory::{AssetDraft, AssetInventory, AssetPatch};
pub use purchase::PurchasePage;
pub use routes::Route;
pub use session::{DetailValue, ProfileEntry, RegistrationDetails, Role, Session, SessionStore};
pub use storage::{ClientStorage, FileStorage, MemoryStorage};
pub use wallet::{StaticWallet, WalletProvider};

// Common result type
pub type Result<T> = std::result::Result<T, DrearlError>;
