//! cmod-core - Core library for cmod
//!
//! This crate provides the comment moderation logic: the comment and
//! closed-marker records, spam classification, the generic repository and
//! content lookup seams, and the [`CommentService`] that ties them together.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use cmod_core::comment::{ClosedComments, Comment, CommentBuilder, CommentService, CommentStatus, RuleValidator};
//! use cmod_core::content::{ContentItem, MemoryContentManager};
//! use cmod_core::repository::MemoryRepository;
//! use cmod_core::ContentId;
//!
//! let content = MemoryContentManager::with_items([
//!     ContentItem::new(ContentId(1), "Blog"),
//!     ContentItem::new(ContentId(42), "BlogPost").with_container(ContentId(1)),
//! ]);
//! let service = CommentService::new(
//!     Arc::new(MemoryRepository::<Comment>::new()),
//!     Arc::new(MemoryRepository::<ClosedComments>::new()),
//!     Arc::new(RuleValidator::new()),
//!     Arc::new(content),
//! );
//!
//! let comment = CommentBuilder::new(ContentId(42)).author("Ada").text("Nice post").build()?;
//! let created = service.create_comment(comment)?;
//! assert_eq!(created.status, CommentStatus::Pending);
//! assert_eq!(created.commented_on_container, Some(ContentId(1)));
//! # Ok::<(), cmod_core::ModerationError>(())
//! ```

pub mod comment;
pub mod config;
pub mod content;
pub mod error;
pub mod repository;
pub mod types;

pub use comment::CommentService;
pub use error::{ModerationError, Result};
pub use types::*;
