//! On-disk collection format shared by the file-backed stores

use chrono::{DateTime, Utc};
use cmod_core::error::{ModerationError, Result};
use cmod_core::types::SchemaVersion;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Current schema version of collection files
pub const CURRENT_SCHEMA_VERSION: &str = "1.0";

/// A whole collection as stored in one JSON file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionFile<T> {
    /// Schema version for migration
    pub schema_version: String,
    /// When the file was last written
    pub saved_at: DateTime<Utc>,
    /// Highest id ever assigned in this collection, including deleted records
    #[serde(default)]
    pub last_id: u64,
    /// The stored records
    pub records: Vec<T>,
}

impl<T> CollectionFile<T> {
    /// Wrap records with the current schema version
    pub fn new(records: Vec<T>) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION.to_string(),
            saved_at: Utc::now(),
            last_id: 0,
            records,
        }
    }

    /// Check the schema version can be read by this build
    fn check_version(&self) -> Result<()> {
        let version = SchemaVersion::parse(&self.schema_version).ok_or_else(|| {
            ModerationError::UnsupportedSchemaVersion(self.schema_version.clone())
        })?;

        if !version.is_compatible(&SchemaVersion::V1_0) {
            return Err(ModerationError::UnsupportedSchemaVersion(
                self.schema_version.clone(),
            ));
        }

        if self.schema_version != CURRENT_SCHEMA_VERSION {
            info!(
                "Reading collection written with schema {} (current {})",
                self.schema_version, CURRENT_SCHEMA_VERSION
            );
        }
        Ok(())
    }
}

/// Read every record of a collection file; a missing file is an empty collection
pub fn read_collection<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    Ok(read_collection_file(path)?.records)
}

/// Read a whole collection file including its id bookkeeping
pub fn read_collection_file<T: DeserializeOwned>(path: &Path) -> Result<CollectionFile<T>> {
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("Collection {:?} does not exist yet", path);
            return Ok(CollectionFile::new(Vec::new()));
        }
        Err(e) => return Err(ModerationError::Io(e)),
    };

    let reader = BufReader::new(file);
    let collection: CollectionFile<T> = serde_json::from_reader(reader)
        .map_err(|e| ModerationError::Serde(e).with_context(format!("Failed to parse {:?}", path)))?;
    collection.check_version()?;
    Ok(collection)
}

/// Write a collection atomically (write to temp, then rename)
pub fn write_collection<T: Serialize>(path: &Path, records: Vec<T>) -> Result<()> {
    write_collection_file(path, CollectionFile::new(records))
}

/// Write a whole collection file atomically, stamping the current schema
pub fn write_collection_file<T: Serialize>(path: &Path, mut file: CollectionFile<T>) -> Result<()> {
    let temp_path = temp_path(path);
    file.schema_version = CURRENT_SCHEMA_VERSION.to_string();
    file.saved_at = Utc::now();

    let temp_file = fs::File::create(&temp_path).map_err(|e| {
        ModerationError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to create temp file {:?}: {}", temp_path, e),
        ))
    })?;
    let mut writer = BufWriter::new(temp_file);
    serde_json::to_writer_pretty(&mut writer, &file)?;
    writer.flush()?;
    drop(writer);

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        ModerationError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to rename temp file: {}", e),
        ))
    })?;

    debug!("Saved {} records to {:?}", file.records.len(), path);
    Ok(())
}

/// Temporary sibling path used for atomic writes
pub(crate) fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "collection".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}
