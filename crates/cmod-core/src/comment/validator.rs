//! Comment spam classification

use super::model::Comment;
use crate::config::ValidationConfig;
use crate::error::Result;
use tracing::debug;

/// Maximum comment length (default)
pub const MAX_COMMENT_LENGTH: usize = 5000;

/// Minimum comment length
pub const MIN_COMMENT_LENGTH: usize = 1;

/// Maximum number of links before a comment is treated as spam (default)
pub const MAX_LINKS: usize = 3;

/// Classifies candidate comments as legitimate (`true`) or spam (`false`)
pub trait CommentValidator: Send + Sync {
    /// Check a candidate comment
    fn validate_comment(&self, comment: &Comment) -> Result<bool>;
}

impl<F> CommentValidator for F
where
    F: Fn(&Comment) -> bool + Send + Sync,
{
    fn validate_comment(&self, comment: &Comment) -> Result<bool> {
        Ok(self(comment))
    }
}

/// Rule-based validator driven by [`ValidationConfig`]
#[derive(Debug, Clone)]
pub struct RuleValidator {
    min_length: usize,
    max_length: usize,
    max_links: usize,
    blocked_terms: Vec<String>,
    require_email: bool,
}

impl RuleValidator {
    /// Create a new validator with default settings
    pub fn new() -> Self {
        Self::from_config(&ValidationConfig::default())
    }

    /// Create a validator from configuration
    pub fn from_config(config: &ValidationConfig) -> Self {
        Self {
            min_length: config.min_length,
            max_length: config.max_length,
            max_links: config.max_links,
            blocked_terms: config
                .blocked_terms
                .iter()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
            require_email: config.require_email,
        }
    }

    /// Reason the comment would be rejected, if any
    pub fn rejection_reason(&self, comment: &Comment) -> Option<String> {
        let trimmed = comment.text.trim();
        let length = trimmed.chars().count();

        if length < self.min_length {
            return Some(format!("text shorter than {} characters", self.min_length));
        }
        if length > self.max_length {
            return Some(format!("text longer than {} characters", self.max_length));
        }

        let links = count_links(&comment.text) + count_links(&comment.site_name);
        if links > self.max_links {
            return Some(format!("{} links (limit {})", links, self.max_links));
        }

        let haystack = format!("{} {} {}", comment.author, comment.site_name, comment.text)
            .to_lowercase();
        if let Some(term) = self.blocked_terms.iter().find(|t| haystack.contains(t.as_str())) {
            return Some(format!("blocked term '{}'", term));
        }

        if self.require_email && !looks_like_email(&comment.email) {
            return Some("missing or malformed email".to_string());
        }

        None
    }
}

impl Default for RuleValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl CommentValidator for RuleValidator {
    fn validate_comment(&self, comment: &Comment) -> Result<bool> {
        match self.rejection_reason(comment) {
            Some(reason) => {
                debug!("Comment on {} rejected: {}", comment.commented_on, reason);
                Ok(false)
            }
            None => Ok(true),
        }
    }
}

fn count_links(text: &str) -> usize {
    let lower = text.to_lowercase();
    lower.matches("http://").count() + lower.matches("https://").count()
}

/// Loose `local@domain.tld` shape check
fn looks_like_email(email: &str) -> bool {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.contains(char::is_whitespace)
        && domain
            .rsplit_once('.')
            .map(|(name, tld)| !name.is_empty() && !tld.is_empty())
            .unwrap_or(false)
}
