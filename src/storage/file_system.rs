use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use super::ClientStorage;
use crate::error::StorageError;

/// File-backed client storage, one `<key>.json` file per key
#[derive(Clone, Debug)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a storage instance with the default base directory ("./.drearl")
    pub fn new() -> Self {
        Self {
            base_path: PathBuf::from("./.drearl"),
        }
    }

    /// Create storage with custom base directory (config, tests)
    pub fn new_with_base_dir(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Get the base directory path
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_path
    }

    fn item_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() || key.contains(|c: char| c == '/' || c == '\\') || key.contains("..") {
            return Err(StorageError::Unavailable(format!(
                "invalid storage key '{}'",
                key
            )));
        }
        Ok(self.base_path.join(format!("{}.json", key)))
    }

    /// A base path that exists but is not a directory makes storage unusable
    fn check_base_dir(&self) -> Result<(), StorageError> {
        if self.base_path.exists() && !self.base_path.is_dir() {
            return Err(StorageError::Unavailable(format!(
                "{} is not a directory",
                self.base_path.display()
            )));
        }
        Ok(())
    }

    fn ensure_base_dir(&self) -> Result<(), StorageError> {
        self.check_base_dir()?;
        fs::create_dir_all(&self.base_path).map_err(unavailable)?;
        Ok(())
    }
}

impl Default for FileStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.item_path(key)?;
        self.check_base_dir()?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(unavailable(e)),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.item_path(key)?;
        self.ensure_base_dir()?;

        // Write-then-rename so a crash never leaves a half-written record
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(unavailable)?;
        fs::rename(&tmp, &path).map_err(unavailable)?;
        log::debug!("Stored '{}' ({} bytes)", key, value.len());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.item_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(unavailable(e)),
        }
    }
}

fn unavailable(e: std::io::Error) -> StorageError {
    match e.kind() {
        ErrorKind::PermissionDenied => StorageError::Unavailable(e.to_string()),
        _ => StorageError::Io(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_item_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new_with_base_dir(temp_dir.path().join("store"));
        assert!(storage.get_item("userData").unwrap().is_none());
    }

    #[test]
    fn test_set_get_remove() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new_with_base_dir(temp_dir.path().join("store"));

        storage.set_item("assets", "[]").unwrap();
        assert_eq!(storage.get_item("assets").unwrap().as_deref(), Some("[]"));

        storage.remove_item("assets").unwrap();
        assert!(storage.get_item("assets").unwrap().is_none());

        // Removing again is not an error
        storage.remove_item("assets").unwrap();
    }

    #[test]
    fn test_base_path_is_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("blocker");
        std::fs::write(&file_path, "x").unwrap();

        let storage = FileStorage::new_with_base_dir(file_path);
        assert!(matches!(
            storage.set_item("userData", "{}"),
            Err(StorageError::Unavailable(_))
        ));
        assert!(matches!(
            storage.get_item("userData"),
            Err(StorageError::Unavailable(_))
        ));
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new_with_base_dir(temp_dir.path().to_path_buf());
        assert!(storage.set_item("../escape", "x").is_err());
    }
}
