//! Comment data models

use crate::error::ModerationError;
use crate::repository::Record;
use crate::types::{CommentId, ContentId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A user comment attached to a content item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Store-assigned identifier
    pub id: CommentId,
    /// Display name of the author
    pub author: String,
    /// Author email
    #[serde(default)]
    pub email: String,
    /// Author's web site
    #[serde(default)]
    pub site_name: String,
    /// Comment body
    pub text: String,
    /// Moderation status
    #[serde(default)]
    pub status: CommentStatus,
    /// Content item this comment is attached to
    pub commented_on: ContentId,
    /// Container of the commented content, kept for coarse-grained queries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commented_on_container: Option<ContentId>,
    /// When the comment was submitted
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Create an unsaved comment on a content item
    pub fn new(commented_on: ContentId, author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: CommentId::UNASSIGNED,
            author: author.into(),
            email: String::new(),
            site_name: String::new(),
            text: text.into(),
            status: CommentStatus::default(),
            commented_on,
            commented_on_container: None,
            created_at: Utc::now(),
        }
    }

    /// Overwrite every user-editable field
    pub fn apply(&mut self, update: CommentUpdate) {
        self.author = update.author;
        self.email = update.email;
        self.site_name = update.site_name;
        self.text = update.text;
        self.status = update.status;
    }
}

impl Record for Comment {
    const COLLECTION: &'static str = "comments";

    fn id(&self) -> u64 {
        self.id.0
    }

    fn set_id(&mut self, id: u64) {
        self.id = CommentId(id);
    }
}

/// Full replacement of a comment's mutable fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentUpdate {
    pub author: String,
    pub email: String,
    pub site_name: String,
    pub text: String,
    pub status: CommentStatus,
}

impl From<&Comment> for CommentUpdate {
    fn from(comment: &Comment) -> Self {
        Self {
            author: comment.author.clone(),
            email: comment.email.clone(),
            site_name: comment.site_name.clone(),
            text: comment.text.clone(),
            status: comment.status,
        }
    }
}

/// Moderation status of a comment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentStatus {
    /// Waiting for a moderator
    #[default]
    Pending,
    /// Visible to readers
    Approved,
    /// Classified as spam
    Spam,
}

impl CommentStatus {
    /// All statuses, in display order
    pub const ALL: [CommentStatus; 3] = [
        CommentStatus::Pending,
        CommentStatus::Approved,
        CommentStatus::Spam,
    ];

    /// Lowercase name used on the wire and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentStatus::Pending => "pending",
            CommentStatus::Approved => "approved",
            CommentStatus::Spam => "spam",
        }
    }
}

impl fmt::Display for CommentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommentStatus {
    type Err = ModerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(CommentStatus::Pending),
            "approved" => Ok(CommentStatus::Approved),
            "spam" => Ok(CommentStatus::Spam),
            other => Err(ModerationError::Validation(format!(
                "Unknown comment status '{}' (expected pending, approved or spam)",
                other
            ))),
        }
    }
}

/// Marker whose presence disables commenting on a content item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosedComments {
    /// Store-assigned identifier
    pub id: u64,
    /// The content item that no longer accepts comments
    pub content_item_id: ContentId,
}

impl ClosedComments {
    /// Create an unsaved marker for a content item
    pub fn new(content_item_id: ContentId) -> Self {
        Self {
            id: 0,
            content_item_id,
        }
    }
}

impl Record for ClosedComments {
    const COLLECTION: &'static str = "closed_comments";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn create_test_comment() -> Comment {
        let mut comment = Comment::new(ContentId(42), "Ada", "Nice post");
        comment.email = "ada@example.com".to_string();
        comment.site_name = "https://ada.example.com".to_string();
        comment
    }

    #[test]
    fn test_new_comment_defaults() {
        let comment = create_test_comment();
        assert_eq!(comment.id, CommentId::UNASSIGNED);
        assert_eq!(comment.status, CommentStatus::Pending);
        assert_eq!(comment.commented_on_container, None);
    }

    #[test]
    fn test_apply_update_overwrites_all_fields() {
        let mut comment = create_test_comment();
        comment.apply(CommentUpdate {
            author: "Grace".to_string(),
            email: "grace@example.com".to_string(),
            site_name: String::new(),
            text: "Edited".to_string(),
            status: CommentStatus::Approved,
        });

        assert_eq!(comment.author, "Grace");
        assert_eq!(comment.email, "grace@example.com");
        assert_eq!(comment.site_name, "");
        assert_eq!(comment.text, "Edited");
        assert_eq!(comment.status, CommentStatus::Approved);
        assert_eq!(comment.commented_on, ContentId(42));
    }

    #[test]
    fn test_status_parse_and_display() {
        assert_eq!("Approved".parse::<CommentStatus>().unwrap(), CommentStatus::Approved);
        assert_eq!(" spam ".parse::<CommentStatus>().unwrap(), CommentStatus::Spam);
        assert!("deleted".parse::<CommentStatus>().is_err());

        for status in CommentStatus::ALL {
            assert_eq!(status.to_string().parse::<CommentStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_record_ids() {
        let mut comment = create_test_comment();
        comment.set_id(9);
        assert_eq!(comment.id, CommentId(9));
        assert_eq!(Record::id(&comment), 9);

        let mut marker = ClosedComments::new(ContentId(3));
        marker.set_id(1);
        assert_eq!(marker.id, 1);
    }

    #[test]
    fn test_comment_serialization() {
        let mut comment = create_test_comment();
        comment.commented_on_container = Some(ContentId(7));
        let json = serde_json::to_string(&comment).unwrap();
        assert!(json.contains("\"status\":\"pending\""));

        let comment2: Comment = serde_json::from_str(&json).unwrap();
        assert_eq!(comment, comment2);
    }

    #[test]
    fn test_container_omitted_when_absent() {
        let json = serde_json::to_string(&create_test_comment()).unwrap();
        assert!(!json.contains("commented_on_container"));
    }
}
