//! Durable client storage
//!
//! - Key/value trait mirroring browser local storage
//! - File system backend
//! - In-memory backend (tests, storage-disabled hosts)

mod file_system;
mod memory;

pub use file_system::FileStorage;
pub use memory::MemoryStorage;

use crate::error::StorageError;

/// Storage key holding the serialized session
pub const SESSION_KEY: &str = "userData";

/// Storage key holding the serialized asset list
pub const ASSETS_KEY: &str = "assets";

/// String key/value storage that survives restarts
///
/// Every call may fail with [`StorageError::Unavailable`] when the medium is
/// inaccessible. Callers decide whether that degrades to "absent".
pub trait ClientStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}
