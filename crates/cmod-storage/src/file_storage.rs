//! Data directory layout and service wiring

use crate::content_catalog::FileContentCatalog;
use crate::json_repository::JsonFileRepository;
use cmod_core::comment::{ClosedComments, Comment, CommentService, CommentValidator};
use cmod_core::error::{ModerationError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// File system based storage for all cmod collections
pub struct FileSystemStorage {
    data_dir: PathBuf,
    comments: Arc<JsonFileRepository<Comment>>,
    closed_comments: Arc<JsonFileRepository<ClosedComments>>,
    content: Arc<FileContentCatalog>,
}

impl FileSystemStorage {
    /// Open (and create if needed) a data directory
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        ensure_dir(&data_dir)?;

        Ok(Self {
            comments: Arc::new(JsonFileRepository::open(&data_dir)),
            closed_comments: Arc::new(JsonFileRepository::open(&data_dir)),
            content: Arc::new(FileContentCatalog::open(&data_dir)),
            data_dir,
        })
    }

    /// Data directory
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Comment store
    pub fn comments(&self) -> Arc<JsonFileRepository<Comment>> {
        self.comments.clone()
    }

    /// Closed-marker store
    pub fn closed_comments(&self) -> Arc<JsonFileRepository<ClosedComments>> {
        self.closed_comments.clone()
    }

    /// Content catalog
    pub fn content(&self) -> Arc<FileContentCatalog> {
        self.content.clone()
    }

    /// Build a comment service over this storage
    pub fn comment_service(&self, validator: Arc<dyn CommentValidator>) -> CommentService {
        CommentService::new(
            self.comments.clone(),
            self.closed_comments.clone(),
            validator,
            self.content.clone(),
        )
    }
}

/// Per-user data directory (~/.cmod when no platform directory is known)
pub fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "cmod", "cmod")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".cmod")
        })
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| {
            ModerationError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create data directory {:?}: {}", dir, e),
            ))
        })?;
        debug!("Created data directory: {:?}", dir);
    }
    Ok(())
}
