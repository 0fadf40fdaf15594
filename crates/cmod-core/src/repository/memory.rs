//! In-memory repository backed by an ordered map

use super::{next_id, Record, Repository};
use crate::error::{ModerationError, Result};
use std::collections::BTreeMap;
use std::sync::RwLock;
use tracing::debug;

/// In-memory record storage, useful for tests and embedding
pub struct MemoryRepository<T: Record> {
    table: RwLock<Table<T>>,
}

struct Table<T> {
    records: BTreeMap<u64, T>,
    last_id: u64,
}

impl<T: Record> MemoryRepository<T> {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table {
                records: BTreeMap::new(),
                last_id: 0,
            }),
        }
    }

    fn poisoned() -> ModerationError {
        ModerationError::Storage(format!("{} lock poisoned", T::COLLECTION))
    }
}

impl<T: Record> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> Repository<T> for MemoryRepository<T> {
    fn create(&self, record: &mut T) -> Result<()> {
        let mut table = self.table.write().map_err(|_| Self::poisoned())?;
        let id = next_id(table.last_id, table.records.keys())?;
        record.set_id(id);
        table.records.insert(id, record.clone());
        table.last_id = id;
        debug!("Created {} record {}", T::COLLECTION, id);
        Ok(())
    }

    fn get(&self, id: u64) -> Result<Option<T>> {
        let table = self.table.read().map_err(|_| Self::poisoned())?;
        Ok(table.records.get(&id).cloned())
    }

    fn update(&self, record: &T) -> Result<()> {
        let mut table = self.table.write().map_err(|_| Self::poisoned())?;
        let slot = table
            .records
            .get_mut(&record.id())
            .ok_or_else(|| ModerationError::NotFound {
                collection: T::COLLECTION.to_string(),
                id: record.id(),
            })?;
        *slot = record.clone();
        Ok(())
    }

    fn delete(&self, id: u64) -> Result<bool> {
        let mut table = self.table.write().map_err(|_| Self::poisoned())?;
        Ok(table.records.remove(&id).is_some())
    }

    fn table(&self) -> Result<Vec<T>> {
        let table = self.table.read().map_err(|_| Self::poisoned())?;
        Ok(table.records.values().cloned().collect())
    }

    fn count(&self) -> Result<usize> {
        let table = self.table.read().map_err(|_| Self::poisoned())?;
        Ok(table.records.len())
    }
}
