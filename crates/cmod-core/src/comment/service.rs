//! Comment moderation service

use super::model::{ClosedComments, Comment, CommentStatus, CommentUpdate};
use super::validator::CommentValidator;
use crate::content::{ContentItemMetadata, ContentManager};
use crate::error::{ModerationError, Result};
use crate::repository::Repository;
use crate::types::{CommentId, ContentId};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Retrieval, creation and moderation of comments on content items
pub struct CommentService {
    comments: Arc<dyn Repository<Comment>>,
    closed_comments: Arc<dyn Repository<ClosedComments>>,
    validator: Arc<dyn CommentValidator>,
    content: Arc<dyn ContentManager>,
}

impl CommentService {
    /// Create a service over the given stores and collaborators
    pub fn new(
        comments: Arc<dyn Repository<Comment>>,
        closed_comments: Arc<dyn Repository<ClosedComments>>,
        validator: Arc<dyn CommentValidator>,
        content: Arc<dyn ContentManager>,
    ) -> Self {
        Self {
            comments,
            closed_comments,
            validator,
            content,
        }
    }

    /// All comments
    pub fn get_comments(&self) -> Result<Vec<Comment>> {
        self.comments.table()
    }

    /// All comments with the given status
    pub fn get_comments_by_status(&self, status: CommentStatus) -> Result<Vec<Comment>> {
        self.comments.find(&|c: &Comment| c.status == status)
    }

    /// Comments attached to a content item
    pub fn get_comments_for_commented_content(&self, id: ContentId) -> Result<Vec<Comment>> {
        self.comments.find(&|c: &Comment| c.commented_on == id)
    }

    /// Comments attached to a content item with the given status
    pub fn get_comments_for_commented_content_by_status(
        &self,
        id: ContentId,
        status: CommentStatus,
    ) -> Result<Vec<Comment>> {
        self.comments
            .find(&|c: &Comment| c.commented_on == id && c.status == status)
    }

    /// Comments on any item inside a container (e.g. every post of a blog)
    pub fn get_comments_for_container(&self, container: ContentId) -> Result<Vec<Comment>> {
        self.comments
            .find(&|c: &Comment| c.commented_on_container == Some(container))
    }

    /// Comments on any item inside a container with the given status
    pub fn get_comments_for_container_by_status(
        &self,
        container: ContentId,
        status: CommentStatus,
    ) -> Result<Vec<Comment>> {
        self.comments.find(&|c: &Comment| {
            c.commented_on_container == Some(container) && c.status == status
        })
    }

    /// Look up a single comment
    pub fn get_comment(&self, id: CommentId) -> Result<Option<Comment>> {
        self.comments.get(id.0)
    }

    /// Display metadata of the content a comment points at, `None` if it no longer exists
    pub fn get_display_for_commented_content(
        &self,
        id: ContentId,
    ) -> Result<Option<ContentItemMetadata>> {
        match self.content.get(id)? {
            Some(item) => self.content.item_metadata(&item).map(Some),
            None => {
                debug!("Content item {} no longer exists", id);
                Ok(None)
            }
        }
    }

    /// Classify and store a new comment
    ///
    /// The status is `Pending` when the validator accepts the comment and
    /// `Spam` otherwise. The container of the commented content is recorded
    /// when the content has one. Nothing is stored if classification or
    /// content lookup fails.
    pub fn create_comment(&self, mut comment: Comment) -> Result<Comment> {
        comment.status = if self.validator.validate_comment(&comment)? {
            CommentStatus::Pending
        } else {
            CommentStatus::Spam
        };

        if let Some(container) = self.content.try_get_container_of(comment.commented_on)? {
            comment.commented_on_container = Some(container);
        }

        self.comments.create(&mut comment)?;

        if comment.status == CommentStatus::Spam {
            warn!(
                "Comment {} on {} by '{}' classified as spam",
                comment.id, comment.commented_on, comment.author
            );
        } else {
            info!(
                "Created comment {} on {} (pending)",
                comment.id, comment.commented_on
            );
        }
        Ok(comment)
    }

    /// Overwrite every mutable field of a comment
    pub fn update_comment(&self, id: CommentId, update: CommentUpdate) -> Result<Comment> {
        let mut comment = self.load(id)?;
        comment.apply(update);
        self.comments.update(&comment)?;
        info!("Updated comment {}", id);
        Ok(comment)
    }

    /// Mark a comment approved
    pub fn approve_comment(&self, id: CommentId) -> Result<Comment> {
        self.set_status(id, CommentStatus::Approved)
    }

    /// Send a comment back to the moderation queue
    pub fn pend_comment(&self, id: CommentId) -> Result<Comment> {
        self.set_status(id, CommentStatus::Pending)
    }

    /// Mark a comment as spam
    pub fn mark_comment_as_spam(&self, id: CommentId) -> Result<Comment> {
        self.set_status(id, CommentStatus::Spam)
    }

    /// Delete a comment, returning what was removed
    pub fn delete_comment(&self, id: CommentId) -> Result<Comment> {
        let comment = self.load(id)?;
        if !self.comments.delete(id.0)? {
            return Err(ModerationError::CommentNotFound(id));
        }
        info!("Deleted comment {}", id);
        Ok(comment)
    }

    /// Whether commenting is disabled for a content item
    pub fn comments_closed_for_commented_content(&self, id: ContentId) -> Result<bool> {
        Ok(self.closed_marker(id)?.is_some())
    }

    /// Disable commenting on a content item
    ///
    /// Closing already-closed content leaves the single existing marker in place.
    pub fn close_comments_for_commented_content(&self, id: ContentId) -> Result<()> {
        if self.closed_marker(id)?.is_some() {
            warn!("Comments already closed for {}", id);
            return Ok(());
        }

        let mut marker = ClosedComments::new(id);
        self.closed_comments.create(&mut marker)?;
        info!("Closed comments for {}", id);
        Ok(())
    }

    /// Re-enable commenting on a content item; no-op if it was not closed
    pub fn enable_comments_for_commented_content(&self, id: ContentId) -> Result<()> {
        let markers = self
            .closed_comments
            .find(&|m: &ClosedComments| m.content_item_id == id)?;

        if markers.is_empty() {
            debug!("Comments were not closed for {}", id);
            return Ok(());
        }

        for marker in &markers {
            self.closed_comments.delete(marker.id)?;
        }
        info!("Enabled comments for {}", id);
        Ok(())
    }

    /// Number of comments per status, every status present
    pub fn count_by_status(&self) -> Result<BTreeMap<CommentStatus, usize>> {
        let mut counts: BTreeMap<CommentStatus, usize> =
            CommentStatus::ALL.iter().map(|s| (*s, 0)).collect();
        for comment in self.comments.table()? {
            *counts.entry(comment.status).or_insert(0) += 1;
        }
        Ok(counts)
    }

    fn load(&self, id: CommentId) -> Result<Comment> {
        self.comments
            .get(id.0)?
            .ok_or(ModerationError::CommentNotFound(id))
    }

    fn set_status(&self, id: CommentId, status: CommentStatus) -> Result<Comment> {
        let mut comment = self.load(id)?;
        let previous = comment.status;
        comment.status = status;
        self.comments.update(&comment)?;
        info!("Comment {} status {} -> {}", id, previous, status);
        Ok(comment)
    }

    fn closed_marker(&self, id: ContentId) -> Result<Option<ClosedComments>> {
        self.closed_comments
            .find_one(&|m: &ClosedComments| m.content_item_id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::builder::CommentBuilder;
    use crate::comment::validator::RuleValidator;
    use crate::content::{ContentItem, MemoryContentManager};
    use crate::repository::MemoryRepository;
    use pretty_assertions::assert_eq;

    struct Fixture {
        service: CommentService,
        comments: Arc<MemoryRepository<Comment>>,
        closed: Arc<MemoryRepository<ClosedComments>>,
    }

    fn fixture_with(validator: Arc<dyn CommentValidator>) -> Fixture {
        let comments = Arc::new(MemoryRepository::<Comment>::new());
        let closed = Arc::new(MemoryRepository::<ClosedComments>::new());
        let content = Arc::new(MemoryContentManager::with_items([
            ContentItem::new(ContentId(1), "Blog").with_title("Engineering"),
            ContentItem::new(ContentId(42), "BlogPost")
                .with_title("Hello")
                .with_container(ContentId(1)),
            ContentItem::new(ContentId(43), "BlogPost").with_container(ContentId(1)),
            ContentItem::new(ContentId(50), "Page").with_title("About"),
        ]));

        let service = CommentService::new(
            comments.clone(),
            closed.clone(),
            validator,
            content,
        );
        Fixture {
            service,
            comments,
            closed,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(Arc::new(|_: &Comment| true))
    }

    fn candidate(on: u64, text: &str) -> Comment {
        CommentBuilder::new(ContentId(on))
            .author("Ada")
            .email("ada@example.com")
            .text(text)
            .build()
            .unwrap()
    }

    struct FailingValidator;

    impl CommentValidator for FailingValidator {
        fn validate_comment(&self, _comment: &Comment) -> Result<bool> {
            Err(ModerationError::Validation("classifier offline".to_string()))
        }
    }

    #[test]
    fn test_create_valid_comment_is_pending_with_container() {
        let f = fixture();
        let created = f.service.create_comment(candidate(42, "Nice")).unwrap();

        assert_eq!(created.id, CommentId(1));
        assert_eq!(created.status, CommentStatus::Pending);
        assert_eq!(created.commented_on, ContentId(42));
        assert_eq!(created.commented_on_container, Some(ContentId(1)));
        assert_eq!(f.service.get_comment(CommentId(1)).unwrap(), Some(created));
    }

    #[test]
    fn test_create_without_container_leaves_default() {
        let f = fixture();
        let created = f.service.create_comment(candidate(50, "Hi")).unwrap();
        assert_eq!(created.commented_on_container, None);

        let on_missing = f.service.create_comment(candidate(999, "Hi")).unwrap();
        assert_eq!(on_missing.commented_on_container, None);
    }

    #[test]
    fn test_create_rejected_comment_is_spam() {
        let f = fixture_with(Arc::new(|_: &Comment| false));
        let mut comment = candidate(42, "Buy now");
        comment.status = CommentStatus::Approved;

        let created = f.service.create_comment(comment).unwrap();
        assert_eq!(created.status, CommentStatus::Spam);
    }

    #[test]
    fn test_create_with_rule_validator() {
        let f = fixture_with(Arc::new(RuleValidator::new()));
        let spam = candidate(42, "https://a https://b https://c https://d");
        assert_eq!(f.service.create_comment(spam).unwrap().status, CommentStatus::Spam);
        assert_eq!(
            f.service.create_comment(candidate(42, "thanks")).unwrap().status,
            CommentStatus::Pending
        );
    }

    #[test]
    fn test_create_validator_failure_persists_nothing() {
        let f = fixture_with(Arc::new(FailingValidator));
        assert!(f.service.create_comment(candidate(42, "Nice")).is_err());
        assert_eq!(f.comments.count().unwrap(), 0);
    }

    #[test]
    fn test_get_comments_by_status() {
        let f = fixture();
        for text in ["a", "b", "c"] {
            f.service.create_comment(candidate(42, text)).unwrap();
        }
        f.service.approve_comment(CommentId(2)).unwrap();
        f.service.mark_comment_as_spam(CommentId(3)).unwrap();

        let ids = |comments: Vec<Comment>| comments.into_iter().map(|c| c.id).collect::<Vec<_>>();
        assert_eq!(ids(f.service.get_comments().unwrap()).len(), 3);
        assert_eq!(ids(f.service.get_comments_by_status(CommentStatus::Pending).unwrap()), vec![CommentId(1)]);
        assert_eq!(ids(f.service.get_comments_by_status(CommentStatus::Approved).unwrap()), vec![CommentId(2)]);
        assert_eq!(ids(f.service.get_comments_by_status(CommentStatus::Spam).unwrap()), vec![CommentId(3)]);
    }

    #[test]
    fn test_get_comments_for_commented_content() {
        let f = fixture();
        f.service.create_comment(candidate(42, "one")).unwrap();
        f.service.create_comment(candidate(43, "two")).unwrap();
        f.service.create_comment(candidate(42, "three")).unwrap();
        f.service.approve_comment(CommentId(3)).unwrap();

        let on_42 = f.service.get_comments_for_commented_content(ContentId(42)).unwrap();
        assert_eq!(on_42.len(), 2);
        assert!(on_42.iter().all(|c| c.commented_on == ContentId(42)));

        let approved = f
            .service
            .get_comments_for_commented_content_by_status(ContentId(42), CommentStatus::Approved)
            .unwrap();
        assert_eq!(approved.len(), 1);
        assert_eq!(approved[0].text, "three");

        assert!(f.service.get_comments_for_commented_content(ContentId(7)).unwrap().is_empty());
    }

    #[test]
    fn test_get_comments_for_container() {
        let f = fixture();
        f.service.create_comment(candidate(42, "one")).unwrap();
        f.service.create_comment(candidate(43, "two")).unwrap();
        f.service.create_comment(candidate(50, "three")).unwrap();
        f.service.approve_comment(CommentId(2)).unwrap();

        assert_eq!(f.service.get_comments_for_container(ContentId(1)).unwrap().len(), 2);
        let approved = f
            .service
            .get_comments_for_container_by_status(ContentId(1), CommentStatus::Approved)
            .unwrap();
        assert_eq!(approved.len(), 1);
        assert_eq!(approved[0].commented_on, ContentId(43));
    }

    #[test]
    fn test_get_missing_comment_is_none() {
        let f = fixture();
        assert_eq!(f.service.get_comment(CommentId(5)).unwrap(), None);
    }

    #[test]
    fn test_display_for_commented_content() {
        let f = fixture();
        let meta = f.service.get_display_for_commented_content(ContentId(42)).unwrap().unwrap();
        assert_eq!(meta.display_text, "Hello");
        assert!(f.service.get_display_for_commented_content(ContentId(404)).unwrap().is_none());
    }

    #[test]
    fn test_update_comment() {
        let f = fixture();
        f.service.create_comment(candidate(42, "typo")).unwrap();

        let updated = f
            .service
            .update_comment(
                CommentId(1),
                CommentUpdate {
                    author: "Grace".to_string(),
                    email: "grace@example.com".to_string(),
                    site_name: "grace.dev".to_string(),
                    text: "fixed".to_string(),
                    status: CommentStatus::Approved,
                },
            )
            .unwrap();

        let stored = f.service.get_comment(CommentId(1)).unwrap().unwrap();
        assert_eq!(stored, updated);
        assert_eq!(stored.author, "Grace");
        assert_eq!(stored.text, "fixed");
        assert_eq!(stored.status, CommentStatus::Approved);
        assert_eq!(stored.commented_on_container, Some(ContentId(1)));
    }

    #[test]
    fn test_status_transitions() {
        let f = fixture();
        f.service.create_comment(candidate(42, "hello")).unwrap();

        f.service.approve_comment(CommentId(1)).unwrap();
        assert_eq!(
            f.service.get_comment(CommentId(1)).unwrap().unwrap().status,
            CommentStatus::Approved
        );

        f.service.mark_comment_as_spam(CommentId(1)).unwrap();
        assert_eq!(
            f.service.get_comment(CommentId(1)).unwrap().unwrap().status,
            CommentStatus::Spam
        );

        f.service.pend_comment(CommentId(1)).unwrap();
        assert_eq!(
            f.service.get_comment(CommentId(1)).unwrap().unwrap().status,
            CommentStatus::Pending
        );
    }

    #[test]
    fn test_mutations_on_missing_comment_fail() {
        let f = fixture();
        let id = CommentId(77);

        assert!(matches!(f.service.approve_comment(id), Err(ModerationError::CommentNotFound(_))));
        assert!(matches!(f.service.pend_comment(id), Err(ModerationError::CommentNotFound(_))));
        assert!(matches!(f.service.mark_comment_as_spam(id), Err(ModerationError::CommentNotFound(_))));
        assert!(matches!(f.service.delete_comment(id), Err(ModerationError::CommentNotFound(_))));
        let update = CommentUpdate::from(&candidate(42, "x"));
        assert!(matches!(
            f.service.update_comment(id, update),
            Err(ModerationError::CommentNotFound(_))
        ));
    }

    #[test]
    fn test_delete_comment() {
        let f = fixture();
        f.service.create_comment(candidate(42, "bye")).unwrap();

        let deleted = f.service.delete_comment(CommentId(1)).unwrap();
        assert_eq!(deleted.text, "bye");
        assert_eq!(f.service.get_comment(CommentId(1)).unwrap(), None);
        assert!(f.service.get_comments().unwrap().is_empty());
    }

    #[test]
    fn test_close_and_enable_comments() {
        let f = fixture();
        let id = ContentId(42);

        assert!(!f.service.comments_closed_for_commented_content(id).unwrap());
        f.service.close_comments_for_commented_content(id).unwrap();
        assert!(f.service.comments_closed_for_commented_content(id).unwrap());
        assert!(!f.service.comments_closed_for_commented_content(ContentId(43)).unwrap());

        f.service.enable_comments_for_commented_content(id).unwrap();
        assert!(!f.service.comments_closed_for_commented_content(id).unwrap());
    }

    #[test]
    fn test_close_twice_keeps_one_marker() {
        let f = fixture();
        f.service.close_comments_for_commented_content(ContentId(42)).unwrap();
        f.service.close_comments_for_commented_content(ContentId(42)).unwrap();
        assert_eq!(f.closed.count().unwrap(), 1);

        f.service.enable_comments_for_commented_content(ContentId(42)).unwrap();
        assert!(!f.service.comments_closed_for_commented_content(ContentId(42)).unwrap());
    }

    #[test]
    fn test_enable_removes_duplicate_markers() {
        let f = fixture();
        f.closed.create(&mut ClosedComments::new(ContentId(42))).unwrap();
        f.closed.create(&mut ClosedComments::new(ContentId(42))).unwrap();

        f.service.enable_comments_for_commented_content(ContentId(42)).unwrap();
        assert!(!f.service.comments_closed_for_commented_content(ContentId(42)).unwrap());
        assert_eq!(f.closed.count().unwrap(), 0);
    }

    #[test]
    fn test_enable_when_open_is_noop() {
        let f = fixture();
        f.service.enable_comments_for_commented_content(ContentId(42)).unwrap();
        assert!(!f.service.comments_closed_for_commented_content(ContentId(42)).unwrap());
    }

    #[test]
    fn test_count_by_status() {
        let f = fixture();
        f.service.create_comment(candidate(42, "a")).unwrap();
        f.service.create_comment(candidate(42, "b")).unwrap();
        f.service.approve_comment(CommentId(1)).unwrap();

        let counts = f.service.count_by_status().unwrap();
        assert_eq!(counts[&CommentStatus::Pending], 1);
        assert_eq!(counts[&CommentStatus::Approved], 1);
        assert_eq!(counts[&CommentStatus::Spam], 0);
    }
}
