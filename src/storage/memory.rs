use std::collections::HashMap;
use std::sync::Mutex;

use super::ClientStorage;
use crate::error::StorageError;

/// In-process client storage
///
/// `disabled()` builds an instance where every call fails, the way a browser
/// with storage turned off behaves.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
    disabled: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disabled() -> Self {
        Self {
            items: Mutex::new(HashMap::new()),
            disabled: true,
        }
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.disabled {
            return Err(StorageError::Unavailable(
                "client storage is disabled".to_string(),
            ));
        }
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.items
            .lock()
            .map_err(|_| StorageError::Unavailable("storage lock poisoned".to_string()))
    }
}

impl ClientStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check()?;
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check()?;
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.check()?;
        self.lock()?.remove(key);
        Ok(())
    }
}
