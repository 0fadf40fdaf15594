//! Generic record storage
//!
//! The comment service never talks to a concrete database. It is handed one
//! [`Repository`] per record type and only uses the operations below, so any
//! backend (the in-memory map here, the JSON files in `cmod-storage`, a
//! relational table) can be swapped in.

mod memory;

pub use memory::MemoryRepository;

use crate::error::{ModerationError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A record that can live in a [`Repository`]
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Name of the collection this record type is stored in
    const COLLECTION: &'static str;

    /// Numeric id of the record (0 before the store assigns one)
    fn id(&self) -> u64;

    /// Called by the store when it assigns an id on create
    fn set_id(&mut self, id: u64);
}

/// Trait for record storage implementations
pub trait Repository<T: Record>: Send + Sync {
    /// Store a new record, assigning it the next id
    fn create(&self, record: &mut T) -> Result<()>;

    /// Load a record by id
    fn get(&self, id: u64) -> Result<Option<T>>;

    /// Replace an existing record
    fn update(&self, record: &T) -> Result<()>;

    /// Delete a record by id, returning whether it existed
    fn delete(&self, id: u64) -> Result<bool>;

    /// Materialize every record, ordered by id
    fn table(&self) -> Result<Vec<T>>;

    /// All records matching a predicate
    fn find(&self, predicate: &dyn Fn(&T) -> bool) -> Result<Vec<T>> {
        Ok(self.table()?.into_iter().filter(|r| predicate(r)).collect())
    }

    /// First record matching a predicate
    fn find_one(&self, predicate: &dyn Fn(&T) -> bool) -> Result<Option<T>> {
        Ok(self.table()?.into_iter().find(|r| predicate(r)))
    }

    /// Number of stored records
    fn count(&self) -> Result<usize> {
        Ok(self.table()?.len())
    }
}

/// Next id to assign
///
/// `last_issued` is the highest id the store has ever handed out. Ids of
/// deleted records stay retired, so the result is past both it and every id
/// still in use.
pub fn next_id<'a>(last_issued: u64, ids: impl IntoIterator<Item = &'a u64>) -> Result<u64> {
    ids.into_iter()
        .copied()
        .fold(last_issued, u64::max)
        .checked_add(1)
        .ok_or_else(|| ModerationError::Storage("record id space exhausted".to_string()))
}
