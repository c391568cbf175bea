//! Error types for `scribe-core`.

use thiserror::Error;

use crate::{
  post::PostId, user::UserId, validate::ValidationErrors,
};

#[derive(Debug, Error)]
pub enum Error {
  #[error("user not found: {0}")]
  UserNotFound(String),

  #[error("group not found: {0}")]
  GroupNotFound(String),

  #[error("post not found: {0}")]
  PostNotFound(PostId),

  #[error("user {follower} does not follow user {author}")]
  FollowNotFound { follower: UserId, author: UserId },

  /// `author` is the username of the post's real author.
  #[error("user {editor} is not the author of post {post_id}")]
  NotAuthor {
    editor:  UserId,
    post_id: PostId,
    author:  String,
  },

  #[error("validation failed: {0}")]
  Validation(ValidationErrors),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

impl From<ValidationErrors> for Error {
  fn from(errors: ValidationErrors) -> Self { Self::Validation(errors) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
