//! Contract Gateway Mock Library
//!
//! In-memory stand-in for the real-estate contract gateway. Purchases stay
//! pending until `POST /dev/confirm`, the way a real chain needs a block
//! before a write becomes visible.

pub mod handlers;
pub mod server;
pub mod state;
pub mod types;

// Re-export commonly used types
pub use server::{create_router, run_server, serve};
pub use state::{Registry, RegistryError, SharedRegistry};
pub use types::*;
