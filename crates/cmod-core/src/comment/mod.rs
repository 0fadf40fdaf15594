//! Comment system module
//!
//! Comment records, spam classification and the moderation service.

pub mod builder;
pub mod model;
pub mod service;
pub mod validator;

pub use builder::CommentBuilder;
pub use model::*;
pub use service::CommentService;
pub use validator::{CommentValidator, RuleValidator};
