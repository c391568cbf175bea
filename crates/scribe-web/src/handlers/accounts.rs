//! Sign-up and the Basic-auth login endpoint.

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use scribe_core::{
  store::BlogStore,
  user::{SignupForm, USERNAME_TAKEN},
  validate::ValidationErrors,
};
use serde::Deserialize;

use super::found;
use crate::{
  AppState,
  auth::{MaybeUser, hash_password},
  error::Error,
};

/// `POST /auth/signup/`, body: `{"username":"...","password":"..."}`
pub async fn signup<S>(
  State(state): State<AppState<S>>,
  Json(form): Json<SignupForm>,
) -> Result<Response, Error>
where
  S: BlogStore + 'static,
{
  let signup = form.validate()?;

  let taken = state
    .store
    .get_user_by_username(&signup.username)
    .await
    .map_err(Error::store)?
    .is_some();
  if taken {
    let mut errors = ValidationErrors::new();
    errors.add("username", USERNAME_TAKEN);
    return Err(errors.into());
  }

  let hash = hash_password(&signup.password)?;
  let user = state
    .store
    .create_user(signup.username, hash)
    .await
    .map_err(Error::store)?;
  tracing::info!(user_id = user.user_id, username = %user.username, "user signed up");
  Ok((StatusCode::CREATED, Json(user)).into_response())
}

#[derive(Debug, Deserialize)]
pub struct LoginParams {
  pub next: Option<String>,
}

/// `GET /auth/login/[?next=<path>]`
///
/// With valid credentials, continues to `next`; without any, challenges the
/// client for them.
pub async fn login<S>(
  State(_state): State<AppState<S>>,
  MaybeUser(user): MaybeUser,
  Query(params): Query<LoginParams>,
) -> Result<Response, Error>
where
  S: BlogStore + 'static,
{
  if user.is_none() {
    return Err(Error::Unauthorized);
  }
  Ok(found(local_path(params.next.as_deref())))
}

/// `next` if it stays on this site, otherwise `/`.
fn local_path(next: Option<&str>) -> &str {
  match next {
    Some(path)
      if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') =>
    {
      path
    }
    _ => "/",
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn only_local_paths_are_followed() {
    assert_eq!(local_path(Some("/new/?page=2")), "/new/?page=2");
    assert_eq!(local_path(None), "/");
    assert_eq!(local_path(Some("https://evil.example/")), "/");
    assert_eq!(local_path(Some("//evil.example/")), "/");
    assert_eq!(local_path(Some("/\\evil.example/")), "/");
  }
}
