//! Locally persisted asset inventory (`assets` key)
//!
//! Insertion-ordered list. Nothing here talks to the contract: removing an
//! asset only drops the local record.

use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;

use crate::asset::{Asset, AssetDetails, AssetId};
use crate::error::DrearlError;
use crate::storage::{ClientStorage, ASSETS_KEY};

/// An asset that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDraft {
    /// Caller-chosen id; kept only if no stored asset already uses it
    pub id: Option<AssetId>,
    pub details: AssetDetails,
    pub owner: String,
    pub image_ref: Option<String>,
}

/// Partial update for a stored asset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetPatch {
    /// Replacement field set; must be of the same kind as the stored asset
    pub details: Option<AssetDetails>,
    /// `Some(None)` clears the image
    pub image_ref: Option<Option<String>>,
    pub for_sale: Option<bool>,
}

#[derive(Clone)]
pub struct AssetInventory {
    storage: Arc<dyn ClientStorage>,
}

impl AssetInventory {
    pub fn new(storage: Arc<dyn ClientStorage>) -> Self {
        Self { storage }
    }

    /// All stored assets in insertion order
    ///
    /// Unavailable storage and malformed content both read as an empty list.
    pub fn list(&self) -> Vec<Asset> {
        match self.try_list() {
            Ok(assets) => assets,
            Err(e) => {
                log::warn!("Asset storage unavailable, showing no local assets: {}", e);
                Vec::new()
            }
        }
    }

    /// Like [`list`](Self::list), but an unavailable medium is an error
    pub fn try_list(&self) -> Result<Vec<Asset>, DrearlError> {
        let Some(raw) = self.storage.get_item(ASSETS_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Vec<Asset>>(&raw) {
            Ok(assets) => Ok(assets),
            Err(e) => {
                log::warn!("Discarding malformed stored asset list: {}", e);
                Ok(Vec::new())
            }
        }
    }

    /// Stored list for a read-modify-write
    ///
    /// Unlike [`try_list`](Self::try_list), malformed content is an error so a
    /// write never replaces records it could not read.
    fn load_for_write(&self) -> Result<Vec<Asset>, DrearlError> {
        let Some(raw) = self.storage.get_item(ASSETS_KEY)? else {
            return Ok(Vec::new());
        };
        serde_json::from_str::<Vec<Asset>>(&raw).map_err(|e| {
            log::warn!("Refusing to overwrite malformed stored asset list: {}", e);
            DrearlError::malformed(ASSETS_KEY, e.to_string())
        })
    }

    pub fn get(&self, id: AssetId) -> Option<Asset> {
        self.list().into_iter().find(|asset| asset.id == id)
    }

    /// Store a new asset, assigning a unique id when needed
    pub fn append(&self, draft: AssetDraft) -> Result<Asset, DrearlError> {
        let mut assets = self.load_for_write()?;
        let used: HashSet<AssetId> = assets.iter().map(|asset| asset.id).collect();

        let id = match draft.id {
            Some(id) if !used.contains(&id) => id,
            Some(id) => {
                log::debug!("Asset id {} already stored, assigning a fresh one", id);
                next_free_id(&used, now_millis())
            }
            None => next_free_id(&used, now_millis()),
        };

        let asset = Asset {
            id,
            details: draft.details,
            is_verified: false,
            for_sale: true,
            owner: draft.owner,
            image_ref: draft.image_ref,
        };
        assets.push(asset.clone());
        self.write(&assets)?;

        log::info!("Stored {} asset {} ({})", asset.kind(), asset.id, asset.title());
        Ok(asset)
    }

    /// Apply a patch to a stored asset
    pub fn update(&self, id: AssetId, patch: AssetPatch) -> Result<Asset, DrearlError> {
        let mut assets = self.load_for_write()?;
        let asset = assets
            .iter_mut()
            .find(|asset| asset.id == id)
            .ok_or(DrearlError::AssetNotFound(id))?;

        if let Some(details) = patch.details {
            if details.kind() != asset.kind() {
                return Err(DrearlError::InvalidUpdate(format!(
                    "asset {} is {}, patch is {}",
                    id,
                    asset.kind(),
                    details.kind()
                )));
            }
            asset.details = details;
        }
        if let Some(image_ref) = patch.image_ref {
            asset.image_ref = image_ref;
        }
        if let Some(for_sale) = patch.for_sale {
            asset.for_sale = for_sale;
        }

        let updated = asset.clone();
        self.write(&assets)?;
        log::info!("Updated asset {}", id);
        Ok(updated)
    }

    /// Drop a stored asset; unknown ids are a no-op
    pub fn remove(&self, id: AssetId) -> Result<(), DrearlError> {
        let mut assets = self.load_for_write()?;
        let before = assets.len();
        assets.retain(|asset| asset.id != id);
        if assets.len() == before {
            log::debug!("Asset {} not in local inventory, nothing removed", id);
            return Ok(());
        }
        self.write(&assets)?;
        log::info!("Removed asset {} from local inventory", id);
        Ok(())
    }

    fn write(&self, assets: &[Asset]) -> Result<(), DrearlError> {
        let json = serde_json::to_string(assets)
            .map_err(|e| DrearlError::malformed(ASSETS_KEY, e.to_string()))?;
        self.storage.set_item(ASSETS_KEY, &json)?;
        Ok(())
    }
}

fn now_millis() -> AssetId {
    Utc::now().timestamp_millis().max(0) as AssetId
}

/// First id at or after `candidate` that is not in `used`
fn next_free_id(used: &HashSet<AssetId>, candidate: AssetId) -> AssetId {
    let mut id = candidate;
    while used.contains(&id) {
        id += 1;
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{LandDetails, PropertyDetails};
    use crate::storage::MemoryStorage;

    fn inventory() -> (Arc<MemoryStorage>, AssetInventory) {
        let storage = Arc::new(MemoryStorage::new());
        (storage.clone(), AssetInventory::new(storage))
    }

    fn villa_draft(id: Option<AssetId>) -> AssetDraft {
        AssetDraft {
            id,
            details: AssetDetails::Property(PropertyDetails {
                name: Some("Sunset Villa".to_string()),
                price: Some(90_000),
                ..Default::default()
            }),
            owner: "Ada".to_string(),
            image_ref: None,
        }
    }

    #[test]
    fn test_append_then_list_contains_once() {
        let (_, inventory) = inventory();
        let stored = inventory.append(villa_draft(None)).unwrap();

        let assets = inventory.list();
        assert_eq!(assets.iter().filter(|a| a.id == stored.id).count(), 1);
        assert!(stored.id > 0);
        assert!(stored.for_sale);
        assert!(!stored.is_verified);
    }

    #[test]
    fn test_back_to_back_appends_get_unique_ids() {
        let (_, inventory) = inventory();
        let first = inventory.append(villa_draft(None)).unwrap();
        let second = inventory.append(villa_draft(None)).unwrap();
        assert_ne!(first.id, second.id);

        let ids: Vec<_> = inventory.list().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[test]
    fn test_supplied_id_kept_unless_taken() {
        let (_, inventory) = inventory();
        let first = inventory.append(villa_draft(Some(42))).unwrap();
        assert_eq!(first.id, 42);

        let second = inventory.append(villa_draft(Some(42))).unwrap();
        assert_ne!(second.id, 42);
    }

    #[test]
    fn test_next_free_id_bumps_on_collision() {
        let used: HashSet<AssetId> = [100, 101, 103].into_iter().collect();
        assert_eq!(next_free_id(&used, 100), 102);
        assert_eq!(next_free_id(&used, 99), 99);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let (_, inventory) = inventory();
        inventory.append(villa_draft(Some(1))).unwrap();
        let before = inventory.list();

        inventory.remove(999).unwrap();
        assert_eq!(inventory.list(), before);

        inventory.remove(1).unwrap();
        assert!(inventory.list().is_empty());
    }

    #[test]
    fn test_update_patch() {
        let (_, inventory) = inventory();
        inventory.append(villa_draft(Some(5))).unwrap();

        let updated = inventory
            .update(
                5,
                AssetPatch {
                    for_sale: Some(false),
                    image_ref: Some(Some("ipfs://new".to_string())),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(!updated.for_sale);
        assert_eq!(inventory.get(5).unwrap().image_ref.as_deref(), Some("ipfs://new"));
    }

    #[test]
    fn test_update_rejects_kind_change() {
        let (_, inventory) = inventory();
        inventory.append(villa_draft(Some(5))).unwrap();

        let result = inventory.update(
            5,
            AssetPatch {
                details: Some(AssetDetails::Land(LandDetails::default())),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(DrearlError::InvalidUpdate(_))));
    }

    #[test]
    fn test_update_unknown_id() {
        let (_, inventory) = inventory();
        assert!(matches!(
            inventory.update(1, AssetPatch::default()),
            Err(DrearlError::AssetNotFound(1))
        ));
    }

    #[test]
    fn test_malformed_list_reads_empty() {
        let (storage, inventory) = inventory();
        storage.set_item(ASSETS_KEY, "[{\"id\":").unwrap();
        assert!(inventory.list().is_empty());
    }

    #[test]
    fn test_malformed_list_is_never_overwritten() {
        let (storage, inventory) = inventory();
        let corrupt = "[{\"id\":";
        storage.set_item(ASSETS_KEY, corrupt).unwrap();

        assert!(matches!(
            inventory.append(villa_draft(None)),
            Err(DrearlError::MalformedStoredData { .. })
        ));
        assert!(matches!(
            inventory.update(1, AssetPatch::default()),
            Err(DrearlError::MalformedStoredData { .. })
        ));
        assert!(matches!(
            inventory.remove(1),
            Err(DrearlError::MalformedStoredData { .. })
        ));
        assert_eq!(storage.get_item(ASSETS_KEY).unwrap().as_deref(), Some(corrupt));
    }

    #[test]
    fn test_unavailable_storage() {
        let inventory = AssetInventory::new(Arc::new(MemoryStorage::disabled()));
        assert!(inventory.list().is_empty());
        assert!(matches!(
            inventory.append(villa_draft(None)),
            Err(DrearlError::StorageUnavailable(_))
        ));
    }
}
