//! Content item lookup
//!
//! Comments attach to content items owned by the host system. This module
//! only describes what the comment service needs to know about them: whether
//! an item still exists, how to display it, and which container (blog,
//! forum, ...) it belongs to.

mod memory;

pub use memory::MemoryContentManager;

use crate::error::Result;
use crate::types::ContentId;
use serde::{Deserialize, Serialize};

/// Handle to a content item in the host system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Content item id
    pub id: ContentId,
    /// Content type name, e.g. "BlogPost"
    pub content_type: String,
    /// Human readable title
    #[serde(default)]
    pub title: String,
    /// Parent grouping, when the item belongs to one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<ContentId>,
}

impl ContentItem {
    /// Create an item without title or container
    pub fn new(id: ContentId, content_type: impl Into<String>) -> Self {
        Self {
            id,
            content_type: content_type.into(),
            title: String::new(),
            container: None,
        }
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the container
    pub fn with_container(mut self, container: ContentId) -> Self {
        self.container = Some(container);
        self
    }
}

/// Display metadata of a content item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItemMetadata {
    /// Text to show for the item
    pub display_text: String,
    /// Route to the public view
    pub display_route: String,
    /// Route to the editor
    pub edit_route: String,
}

impl ContentItemMetadata {
    /// Default metadata derived from an item's id, type and title
    pub fn for_item(item: &ContentItem) -> Self {
        let display_text = if item.title.trim().is_empty() {
            format!("{} #{}", item.content_type, item.id)
        } else {
            item.title.clone()
        };

        Self {
            display_text,
            display_route: format!("/content/{}", item.id),
            edit_route: format!("/admin/content/{}/edit", item.id),
        }
    }
}

/// Access to content items of the host system
pub trait ContentManager: Send + Sync {
    /// Resolve a content item, `None` if the id is stale
    fn get(&self, id: ContentId) -> Result<Option<ContentItem>>;

    /// Display metadata for an item
    fn item_metadata(&self, item: &ContentItem) -> Result<ContentItemMetadata> {
        Ok(ContentItemMetadata::for_item(item))
    }

    /// Container of an item, `None` if the item is gone or has no container
    fn try_get_container_of(&self, id: ContentId) -> Result<Option<ContentId>> {
        Ok(self.get(id)?.and_then(|item| item.container))
    }
}
