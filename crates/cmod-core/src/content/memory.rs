//! In-memory content catalog

use super::{ContentItem, ContentManager};
use crate::error::{ModerationError, Result};
use crate::types::ContentId;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Content manager holding items in memory
#[derive(Default)]
pub struct MemoryContentManager {
    items: RwLock<BTreeMap<ContentId, ContentItem>>,
}

impl MemoryContentManager {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog pre-filled with items
    pub fn with_items(items: impl IntoIterator<Item = ContentItem>) -> Self {
        Self {
            items: RwLock::new(items.into_iter().map(|i| (i.id, i)).collect()),
        }
    }

    /// Add or replace an item
    pub fn insert(&self, item: ContentItem) -> Result<()> {
        let mut items = self.items.write().map_err(|_| poisoned())?;
        items.insert(item.id, item);
        Ok(())
    }

    /// Remove an item, returning whether it existed
    pub fn remove(&self, id: ContentId) -> Result<bool> {
        let mut items = self.items.write().map_err(|_| poisoned())?;
        Ok(items.remove(&id).is_some())
    }
}

fn poisoned() -> ModerationError {
    ModerationError::Storage("content catalog lock poisoned".to_string())
}

impl ContentManager for MemoryContentManager {
    fn get(&self, id: ContentId) -> Result<Option<ContentItem>> {
        let items = self.items.read().map_err(|_| poisoned())?;
        Ok(items.get(&id).cloned())
    }
}
