//! Error types and axum `IntoResponse` implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use scribe_core::validate::ValidationErrors;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("validation failed: {0}")]
  Validation(ValidationErrors),

  /// Answered with a `302 Found` to the held location: anonymous requests
  /// go to the login page, non-authors back to the post.
  #[error("redirect to {0}")]
  Redirect(String),

  #[error("unauthorized")]
  Unauthorized,

  #[error("password hashing failed: {0}")]
  PasswordHash(String),

  #[error("failed to encode response: {0}")]
  Encode(#[from] serde_json::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

impl From<scribe_core::Error> for Error {
  fn from(e: scribe_core::Error) -> Self {
    use scribe_core::Error as Core;
    match e {
      Core::UserNotFound(_)
      | Core::GroupNotFound(_)
      | Core::PostNotFound(_)
      | Core::FollowNotFound { .. } => Error::NotFound(e.to_string()),
      Core::NotAuthor { post_id, author, .. } => {
        Error::Redirect(crate::handlers::post_url(&author, post_id))
      }
      Core::Validation(errors) => Error::Validation(errors),
      Core::Store(e) => Error::Store(e),
    }
  }
}

impl From<ValidationErrors> for Error {
  fn from(errors: ValidationErrors) -> Self { Error::Validation(errors) }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::NotFound(msg) => {
        (StatusCode::NOT_FOUND, Json(json!({ "error": msg }))).into_response()
      }
      Error::Validation(errors) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors })))
          .into_response()
      }
      Error::Redirect(location) => crate::handlers::found(&location),
      Error::Unauthorized => {
        let mut res = (
          StatusCode::UNAUTHORIZED,
          Json(json!({ "error": "unauthorized" })),
        )
          .into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"scribe\""),
        );
        res
      }
      Error::PasswordHash(msg) => {
        tracing::error!(error = %msg, "password hashing failed");
        internal_error()
      }
      Error::Encode(e) => {
        tracing::error!(error = %e, "failed to encode response");
        internal_error()
      }
      Error::Store(e) => {
        tracing::error!(error = %e, "store error");
        internal_error()
      }
    }
  }
}

fn internal_error() -> Response {
  (
    StatusCode::INTERNAL_SERVER_ERROR,
    Json(json!({ "error": "internal server error" })),
  )
    .into_response()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unauthorized_carries_basic_challenge() {
    let res = Error::Unauthorized.into_response();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
      res.headers()[header::WWW_AUTHENTICATE],
      "Basic realm=\"scribe\""
    );
  }

  #[test]
  fn redirect_is_a_302() {
    let res =
      Error::Redirect("/auth/login/?next=%2Fnew%2F".into()).into_response();
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(res.headers()[header::LOCATION], "/auth/login/?next=%2Fnew%2F");
  }

  #[test]
  fn core_errors_map_to_http() {
    let not_found: Error = scribe_core::Error::PostNotFound(3).into();
    assert!(matches!(not_found, Error::NotFound(_)));

    let not_author: Error = scribe_core::Error::NotAuthor {
      editor:  2,
      post_id: 7,
      author:  "alice".into(),
    }
    .into();
    let res = not_author.into_response();
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(res.headers()[header::LOCATION], "/alice/7/");

    let store: Error =
      scribe_core::Error::store(std::io::Error::other("disk gone")).into();
    let res = store.into_response();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
  }
}
