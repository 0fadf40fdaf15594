//! cmod-storage - Storage library for cmod
//!
//! This crate provides JSON-file implementations of the repository and
//! content lookup traits defined in `cmod-core`.

mod collection_file;
mod content_catalog;
mod file_storage;
mod json_repository;

pub use collection_file::{CollectionFile, CURRENT_SCHEMA_VERSION};
pub use content_catalog::{FileContentCatalog, CONTENT_FILE};
pub use file_storage::{default_data_dir, FileSystemStorage};
pub use json_repository::JsonFileRepository;
