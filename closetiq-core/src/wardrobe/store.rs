use chrono::Utc;
use tracing::{debug, error, info};

use closetiq_common::error::Error;
use closetiq_common::models::{ClothingItem, ItemId, NewClothingItem, StoredClothingItem};
use closetiq_common::traits::KeyValueStore;

use crate::config::STORAGE_KEY;
use crate::wardrobe::id::IdGenerator;

/// Owns the wardrobe and mirrors it into a [`KeyValueStore`].
///
/// Every mutation rewrites the whole collection under one key before
/// returning. If that write fails the in-memory change is undone, so memory
/// never runs ahead of what is stored.
pub struct WardrobeStore<S> {
    backend: S,
    key: String,
    items: Vec<ClothingItem>,
    ids: IdGenerator,
}

impl<S: KeyValueStore> WardrobeStore<S> {
    pub fn new(backend: S) -> Self {
        Self::with_key(backend, STORAGE_KEY)
    }

    pub fn with_key(backend: S, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
            items: Vec::new(),
            ids: IdGenerator::new(),
        }
    }

    /// Creates a store and loads whatever the backend holds.
    pub async fn open(backend: S) -> Result<Self, Error> {
        let mut store = Self::new(backend);
        store.load().await?;
        Ok(store)
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn items(&self) -> &[ClothingItem] {
        &self.items
    }

    pub fn get(&self, id: &ItemId) -> Option<&ClothingItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Replaces the in-memory wardrobe with the stored one.
    ///
    /// Unreadable data resets to an empty wardrobe and is logged, not returned.
    /// Items saved before ids existed get `now + position` and the repaired
    /// list is written straight back. Returns the number of items loaded.
    pub async fn load(&mut self) -> Result<usize, Error> {
        let raw = match self.backend.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No stored wardrobe under '{}'", self.key);
                self.items.clear();
                return Ok(0);
            }
            Err(Error::Storage(e)) => {
                error!("Failed to load wardrobe data: {}", e);
                self.items.clear();
                return Ok(0);
            }
            Err(e) => return Err(e),
        };

        let stored: Vec<StoredClothingItem> = match serde_json::from_str(&raw) {
            Ok(stored) => stored,
            Err(e) => {
                error!("Failed to load wardrobe data: {}", e);
                self.items.clear();
                return Ok(0);
            }
        };

        let now = Utc::now().timestamp_millis();
        let mut items: Vec<ClothingItem> = Vec::with_capacity(stored.len());
        let mut pending: Vec<(usize, StoredClothingItem)> = Vec::new();

        for (index, entry) in stored.into_iter().enumerate() {
            match entry.stored_id() {
                Some(id) if !items.iter().any(|item| item.id == id) => items.push(entry.with_id(id)),
                _ => pending.push((index, entry)),
            }
        }

        let migrated = pending.len();
        for (index, entry) in pending {
            let id = self
                .ids
                .next_from(now + index as i64, |id| items.iter().any(|item| &item.id == id));
            items.insert(index.min(items.len()), entry.with_id(id));
        }

        self.items = items;

        if migrated > 0 {
            info!("Assigned ids to {} wardrobe items", migrated);
            self.persist().await?;
        }

        Ok(self.items.len())
    }

    /// Assigns a fresh id, appends and persists.
    ///
    /// Type and occasion are already enums here; checking that the user picked
    /// them is the caller's job.
    pub async fn add(&mut self, candidate: NewClothingItem) -> Result<ClothingItem, Error> {
        let items = &self.items;
        let id = self.ids.next(|id| items.iter().any(|item| &item.id == id));
        let item = candidate.into_item(id);

        self.items.push(item.clone());
        if let Err(e) = self.persist().await {
            self.items.pop();
            return Err(e);
        }

        info!("Added {} ({}, {}) to wardrobe", item.id, item.kind, item.occasion);
        Ok(item)
    }

    /// Removes the item with `id` if present. Absent ids are not an error.
    pub async fn remove(&mut self, id: &ItemId) -> Result<Option<ClothingItem>, Error> {
        let removed = self
            .items
            .iter()
            .position(|item| &item.id == id)
            .map(|index| (index, self.items.remove(index)));

        if let Err(e) = self.persist().await {
            if let Some((index, item)) = removed {
                self.items.insert(index, item);
            }
            return Err(e);
        }

        match &removed {
            Some(_) => info!("Removed {} from wardrobe", id),
            None => debug!("Remove requested for unknown id {}", id),
        }
        Ok(removed.map(|(_, item)| item))
    }

    /// Writes the full collection under the wardrobe key.
    pub async fn persist(&self) -> Result<(), Error> {
        let serialized = serde_json::to_string(&self.items)?;
        self.backend.set(&self.key, &serialized).await?;
        debug!("Persisted {} wardrobe items", self.items.len());
        Ok(())
    }
}
