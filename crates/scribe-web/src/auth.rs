//! HTTP Basic-auth extractors backed by the user table.
//!
//! [`MaybeUser`] lets anonymous requests through; [`RequireUser`] sends them
//! to the login URL. Credentials that are present but wrong are rejected with
//! `401` by both.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rand_core::OsRng;
use scribe_core::{store::BlogStore, user::User};

use crate::{AppState, error::Error};

/// Characters escaped in the `next` query parameter.
const NEXT_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
  .remove(b'/')
  .remove(b'-')
  .remove(b'_')
  .remove(b'.')
  .remove(b'~');

/// Hash `password` into an argon2 PHC string with a fresh salt.
pub fn hash_password(password: &str) -> Result<String, Error> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| Error::PasswordHash(e.to_string()))
}

/// Split a `Basic` authorization header into username and password.
///
/// `Ok(None)` when the header is absent.
fn basic_credentials(headers: &HeaderMap) -> Result<Option<(String, String)>, Error> {
  let Some(value) = headers.get(header::AUTHORIZATION) else {
    return Ok(None);
  };
  let encoded = value
    .to_str()
    .ok()
    .and_then(|v| v.strip_prefix("Basic "))
    .ok_or(Error::Unauthorized)?;

  let decoded = B64.decode(encoded.trim()).map_err(|_| Error::Unauthorized)?;
  let creds = String::from_utf8(decoded).map_err(|_| Error::Unauthorized)?;
  let (username, password) = creds.split_once(':').ok_or(Error::Unauthorized)?;
  Ok(Some((username.to_string(), password.to_string())))
}

/// Resolve the request's credentials to a user.
pub async fn verify_credentials<S>(
  headers: &HeaderMap,
  store: &S,
) -> Result<Option<User>, Error>
where
  S: BlogStore,
{
  let Some((username, password)) = basic_credentials(headers)? else {
    return Ok(None);
  };

  let (user, stored_hash) = store
    .get_credentials(&username)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| {
      tracing::debug!(%username, "login for unknown user");
      Error::Unauthorized
    })?;

  let parsed = PasswordHash::new(&stored_hash).map_err(|_| Error::Unauthorized)?;
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .map_err(|_| {
      tracing::debug!(%username, "wrong password");
      Error::Unauthorized
    })?;

  Ok(Some(user))
}

/// The login URL that returns to the current request afterwards.
pub fn login_redirect(login_url: &str, parts: &Parts) -> String {
  let next = parts
    .uri
    .path_and_query()
    .map(|pq| pq.as_str())
    .unwrap_or("/");
  format!("{login_url}?next={}", utf8_percent_encode(next, NEXT_ESCAPE))
}

/// The signed-in user, if the request carries credentials.
pub struct MaybeUser(pub Option<User>);

impl<S> FromRequestParts<AppState<S>> for MaybeUser
where
  S: BlogStore + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let user = verify_credentials(&parts.headers, state.store.as_ref()).await?;
    Ok(MaybeUser(user))
  }
}

/// A signed-in user; anonymous requests are redirected to the login URL.
pub struct RequireUser(pub User);

impl<S> FromRequestParts<AppState<S>> for RequireUser
where
  S: BlogStore + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    match verify_credentials(&parts.headers, state.store.as_ref()).await? {
      Some(user) => Ok(RequireUser(user)),
      None => {
        Err(Error::Redirect(login_redirect(&state.config.login_url, parts)))
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use axum::http::Request;

  use super::*;
  use crate::test_support::{basic, state_with_user};

  async fn require(
    req: Request<axum::body::Body>,
    state: &AppState<scribe_store_sqlite::SqliteStore>,
  ) -> Result<RequireUser, Error> {
    let (mut parts, _) = req.into_parts();
    RequireUser::from_request_parts(&mut parts, state).await
  }

  #[tokio::test]
  async fn correct_credentials() {
    let (state, alice) = state_with_user("alice", "secret-pw").await;
    let req = Request::builder()
      .header(header::AUTHORIZATION, basic("alice", "secret-pw"))
      .body(axum::body::Body::empty())
      .unwrap();
    let RequireUser(user) = require(req, &state).await.unwrap();
    assert_eq!(user, alice);
  }

  #[tokio::test]
  async fn wrong_password() {
    let (state, _) = state_with_user("alice", "secret-pw").await;
    let req = Request::builder()
      .header(header::AUTHORIZATION, basic("alice", "nope"))
      .body(axum::body::Body::empty())
      .unwrap();
    assert!(matches!(require(req, &state).await, Err(Error::Unauthorized)));
  }

  #[tokio::test]
  async fn unknown_user() {
    let (state, _) = state_with_user("alice", "secret-pw").await;
    let req = Request::builder()
      .header(header::AUTHORIZATION, basic("mallory", "secret-pw"))
      .body(axum::body::Body::empty())
      .unwrap();
    assert!(matches!(require(req, &state).await, Err(Error::Unauthorized)));
  }

  #[tokio::test]
  async fn invalid_base64() {
    let (state, _) = state_with_user("alice", "secret-pw").await;
    let req = Request::builder()
      .header(header::AUTHORIZATION, "Basic !!!not-base64!!!")
      .body(axum::body::Body::empty())
      .unwrap();
    assert!(matches!(require(req, &state).await, Err(Error::Unauthorized)));
  }

  #[tokio::test]
  async fn missing_header_redirects_with_next() {
    let (state, _) = state_with_user("alice", "secret-pw").await;
    let req = Request::builder()
      .uri("/new/?page=2")
      .body(axum::body::Body::empty())
      .unwrap();
    match require(req, &state).await {
      Err(Error::Redirect(location)) => {
        assert_eq!(location, "/auth/login/?next=/new/%3Fpage%3D2");
      }
      _ => panic!("expected a login redirect"),
    }
  }

  #[tokio::test]
  async fn maybe_user_allows_anonymous() {
    let (state, _) = state_with_user("alice", "secret-pw").await;
    let (mut parts, _) = Request::builder()
      .body(axum::body::Body::empty())
      .unwrap()
      .into_parts();
    let MaybeUser(user) = MaybeUser::from_request_parts(&mut parts, &state)
      .await
      .unwrap();
    assert!(user.is_none());
  }

  #[test]
  fn hashed_passwords_verify() {
    let hash = hash_password("correct horse").unwrap();
    let parsed = PasswordHash::new(&hash).unwrap();
    assert!(
      Argon2::default()
        .verify_password(b"correct horse", &parsed)
        .is_ok()
    );
  }
}
