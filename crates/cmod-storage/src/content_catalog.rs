//! File backed content catalog

use crate::collection_file::{read_collection, write_collection};
use cmod_core::content::{ContentItem, ContentManager};
use cmod_core::error::{ModerationError, Result};
use cmod_core::types::ContentId;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, info};

/// File name of the catalog inside the data directory
pub const CONTENT_FILE: &str = "content.json";

/// Content items known to cmod, kept in `<dir>/content.json`
///
/// Stands in for the host system's content store when cmod runs on its own.
pub struct FileContentCatalog {
    path: PathBuf,
    lock: RwLock<()>,
}

impl FileContentCatalog {
    /// Open the catalog inside `dir`
    pub fn open(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(CONTENT_FILE),
            lock: RwLock::new(()),
        }
    }

    /// Add or replace a content item
    pub fn register(&self, item: ContentItem) -> Result<()> {
        let _guard = self.lock.write().map_err(|_| poisoned())?;
        let mut items = self.load()?;

        let id = item.id;
        match items.iter_mut().find(|i| i.id == id) {
            Some(existing) => *existing = item,
            None => items.push(item),
        }
        items.sort_by_key(|i| i.id);

        write_collection(&self.path, items)?;
        info!("Registered content item {}", id);
        Ok(())
    }

    /// Remove a content item, returning whether it existed
    pub fn remove(&self, id: ContentId) -> Result<bool> {
        let _guard = self.lock.write().map_err(|_| poisoned())?;
        let mut items = self.load()?;

        let before = items.len();
        items.retain(|i| i.id != id);
        if items.len() == before {
            return Ok(false);
        }

        write_collection(&self.path, items)?;
        debug!("Removed content item {}", id);
        Ok(true)
    }

    /// All known content items, ordered by id
    pub fn list(&self) -> Result<Vec<ContentItem>> {
        let _guard = self.lock.read().map_err(|_| poisoned())?;
        self.load()
    }

    fn load(&self) -> Result<Vec<ContentItem>> {
        read_collection(&self.path)
    }
}

fn poisoned() -> ModerationError {
    ModerationError::Storage("content catalog lock poisoned".to_string())
}

impl ContentManager for FileContentCatalog {
    fn get(&self, id: ContentId) -> Result<Option<ContentItem>> {
        let _guard = self.lock.read().map_err(|_| poisoned())?;
        Ok(self.load()?.into_iter().find(|i| i.id == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_register_and_get() {
        let temp = TempDir::new().unwrap();
        let catalog = FileContentCatalog::open(temp.path());

        catalog
            .register(ContentItem::new(ContentId(42), "BlogPost").with_container(ContentId(1)))
            .unwrap();

        let item = catalog.get(ContentId(42)).unwrap().unwrap();
        assert_eq!(item.content_type, "BlogPost");
        assert_eq!(catalog.try_get_container_of(ContentId(42)).unwrap(), Some(ContentId(1)));
        assert!(catalog.get(ContentId(7)).unwrap().is_none());
    }

    #[test]
    fn test_register_replaces() {
        let temp = TempDir::new().unwrap();
        let catalog = FileContentCatalog::open(temp.path());

        catalog.register(ContentItem::new(ContentId(2), "Page")).unwrap();
        catalog
            .register(ContentItem::new(ContentId(2), "Page").with_title("About"))
            .unwrap();
        catalog.register(ContentItem::new(ContentId(1), "Blog")).unwrap();

        let items = catalog.list().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, ContentId(1));
        assert_eq!(items[1].title, "About");
    }

    #[test]
    fn test_remove() {
        let temp = TempDir::new().unwrap();
        let catalog = FileContentCatalog::open(temp.path());
        catalog.register(ContentItem::new(ContentId(5), "Page")).unwrap();

        assert!(catalog.remove(ContentId(5)).unwrap());
        assert!(!catalog.remove(ContentId(5)).unwrap());
        assert!(catalog.list().unwrap().is_empty());
    }

    #[test]
    fn test_metadata_for_registered_item() {
        let temp = TempDir::new().unwrap();
        let catalog = FileContentCatalog::open(temp.path());
        let item = ContentItem::new(ContentId(9), "Page").with_title("Contact");
        catalog.register(item.clone()).unwrap();

        let meta = catalog.item_metadata(&item).unwrap();
        assert_eq!(meta.display_text, "Contact");
    }
}
