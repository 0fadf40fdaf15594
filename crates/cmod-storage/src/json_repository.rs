//! JSON file backed repository

use crate::collection_file::{read_collection_file, write_collection_file, CollectionFile};
use cmod_core::error::{ModerationError, Result};
use cmod_core::repository::{next_id, Record, Repository};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::debug;

/// Repository keeping one collection in `<dir>/<collection>.json`
///
/// Every operation reads the file and every mutation rewrites it atomically.
/// Writers inside one process are serialized; there is no cross-process lock.
pub struct JsonFileRepository<T: Record> {
    path: PathBuf,
    lock: RwLock<()>,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> JsonFileRepository<T> {
    /// Open the collection for `T` inside `dir`
    pub fn open(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", T::COLLECTION)),
            lock: RwLock::new(()),
            _record: PhantomData,
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<CollectionFile<T>> {
        let mut file: CollectionFile<T> = read_collection_file(&self.path)?;
        file.records.sort_by_key(|r| r.id());
        Ok(file)
    }

    fn poisoned() -> ModerationError {
        ModerationError::Storage(format!("{} lock poisoned", T::COLLECTION))
    }
}

impl<T: Record> Repository<T> for JsonFileRepository<T> {
    fn create(&self, record: &mut T) -> Result<()> {
        let _guard = self.lock.write().map_err(|_| Self::poisoned())?;
        let mut file = self.load()?;

        let id = {
            let ids: Vec<u64> = file.records.iter().map(|r| r.id()).collect();
            next_id(file.last_id, &ids)?
        };
        record.set_id(id);
        file.records.push(record.clone());
        file.last_id = id;

        write_collection_file(&self.path, file)?;
        debug!("Created {} record {}", T::COLLECTION, id);
        Ok(())
    }

    fn get(&self, id: u64) -> Result<Option<T>> {
        let _guard = self.lock.read().map_err(|_| Self::poisoned())?;
        Ok(self.load()?.records.into_iter().find(|r| r.id() == id))
    }

    fn update(&self, record: &T) -> Result<()> {
        let _guard = self.lock.write().map_err(|_| Self::poisoned())?;
        let mut file = self.load()?;

        let slot = file
            .records
            .iter_mut()
            .find(|r| r.id() == record.id())
            .ok_or_else(|| ModerationError::NotFound {
                collection: T::COLLECTION.to_string(),
                id: record.id(),
            })?;
        *slot = record.clone();

        write_collection_file(&self.path, file)
    }

    fn delete(&self, id: u64) -> Result<bool> {
        let _guard = self.lock.write().map_err(|_| Self::poisoned())?;
        let mut file = self.load()?;

        let before = file.records.len();
        file.records.retain(|r| r.id() != id);
        if file.records.len() == before {
            return Ok(false);
        }

        write_collection_file(&self.path, file)?;
        debug!("Deleted {} record {}", T::COLLECTION, id);
        Ok(true)
    }

    fn table(&self) -> Result<Vec<T>> {
        let _guard = self.lock.read().map_err(|_| Self::poisoned())?;
        Ok(self.load()?.records)
    }
}
