//! Comment builder for fluent API

use super::model::{Comment, CommentStatus};
use crate::error::{ModerationError, Result};
use crate::types::{CommentId, ContentId};
use chrono::{DateTime, Utc};

/// Builder for assembling a candidate comment before it is submitted
pub struct CommentBuilder {
    commented_on: ContentId,
    author: Option<String>,
    email: String,
    site_name: String,
    text: Option<String>,
    created_at: Option<DateTime<Utc>>,
}

impl CommentBuilder {
    /// Start a comment on the given content item
    pub fn new(commented_on: ContentId) -> Self {
        Self {
            commented_on,
            author: None,
            email: String::new(),
            site_name: String::new(),
            text: None,
            created_at: None,
        }
    }

    /// Set the author name
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set the author email
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Set the author's site
    pub fn site_name(mut self, site_name: impl Into<String>) -> Self {
        self.site_name = site_name.into();
        self
    }

    /// Set the comment body
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Override the submission time
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Build the comment
    ///
    /// The status is left as `Pending`; the service decides the real status
    /// when the comment is created.
    pub fn build(self) -> Result<Comment> {
        let text = self.text.ok_or_else(|| {
            ModerationError::Validation("Comment text is required".to_string())
        })?;

        if text.trim().is_empty() {
            return Err(ModerationError::Validation(
                "Comment text cannot be empty".to_string(),
            ));
        }

        let author = self
            .author
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| "Anonymous".to_string());

        Ok(Comment {
            id: CommentId::UNASSIGNED,
            author,
            email: self.email.trim().to_string(),
            site_name: self.site_name.trim().to_string(),
            text,
            status: CommentStatus::Pending,
            commented_on: self.commented_on,
            commented_on_container: None,
            created_at: self.created_at.unwrap_or_else(Utc::now),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_basic() {
        let comment = CommentBuilder::new(ContentId(42))
            .author("Ada")
            .email(" ada@example.com ")
            .site_name("ada.dev")
            .text("Great read")
            .build()
            .unwrap();

        assert_eq!(comment.commented_on, ContentId(42));
        assert_eq!(comment.author, "Ada");
        assert_eq!(comment.email, "ada@example.com");
        assert_eq!(comment.site_name, "ada.dev");
        assert_eq!(comment.text, "Great read");
        assert_eq!(comment.status, CommentStatus::Pending);
        assert!(!comment.id.is_assigned());
    }

    #[test]
    fn test_builder_requires_text() {
        assert!(CommentBuilder::new(ContentId(1)).author("x").build().is_err());
        assert!(CommentBuilder::new(ContentId(1)).text("   ").build().is_err());
    }

    #[test]
    fn test_builder_anonymous_author() {
        let comment = CommentBuilder::new(ContentId(1))
            .author("  ")
            .text("hello")
            .build()
            .unwrap();
        assert_eq!(comment.author, "Anonymous");
    }

    #[test]
    fn test_builder_created_at() {
        let at = DateTime::parse_from_rfc3339("2024-01-02T03:04:05Z")
            .unwrap()
            .with_timezone(&Utc);
        let comment = CommentBuilder::new(ContentId(1))
            .text("hello")
            .created_at(at)
            .build()
            .unwrap();
        assert_eq!(comment.created_at, at);
    }
}
