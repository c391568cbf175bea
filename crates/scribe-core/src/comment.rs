//! Comments attached to posts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  post::PostId,
  user::UserId,
  validate::{ValidationErrors, required_text},
};

pub type CommentId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
  pub comment_id: CommentId,
  pub post_id:    PostId,
  pub author_id:  UserId,
  pub author:     String,
  pub text:       String,
  /// Server-assigned; never changes after creation.
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::BlogStore::create_comment`].
#[derive(Debug, Clone)]
pub struct NewComment {
  pub post_id:   PostId,
  pub author_id: UserId,
  pub text:      String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentForm {
  #[serde(default)]
  pub text: String,
}

impl CommentForm {
  /// Returns the trimmed text.
  pub fn validate(self) -> Result<String, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let text = required_text(&mut errors, "text", &self.text);
    errors.into_result(text)
  }
}
