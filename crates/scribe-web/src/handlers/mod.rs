pub mod accounts;
pub mod comments;
pub mod feeds;
pub mod posts;
pub mod profile;

use axum::{
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use scribe_core::{
  pagination::PageSelector,
  post::{Post, PostId},
  store::BlogStore,
  user::User,
};
use serde::Deserialize;

use crate::error::Error;

/// `302 Found` pointing at `location`.
pub fn found(location: &str) -> Response {
  (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

pub(super) fn profile_url(username: &str) -> String { format!("/{username}/") }

pub(super) fn post_url(username: &str, post_id: PostId) -> String {
  format!("/{username}/{post_id}/")
}

const SEGMENT_ESCAPE: &AsciiSet =
  &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// [`post_url`] for path segments that have not been checked against the
/// store.
pub(super) fn raw_post_url(username: &str, raw_id: &str) -> String {
  format!(
    "/{}/{}/",
    utf8_percent_encode(username, SEGMENT_ESCAPE),
    utf8_percent_encode(raw_id, SEGMENT_ESCAPE)
  )
}

/// `?page=` as sent by the client; anything unparseable means page one.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
  pub page: Option<String>,
}

impl PageParams {
  pub fn selector(&self) -> PageSelector { PageSelector::parse(self.page.as_deref()) }
}

pub(super) async fn load_author<S>(store: &S, username: &str) -> Result<User, Error>
where
  S: BlogStore,
{
  store
    .get_user_by_username(username)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| scribe_core::Error::UserNotFound(username.to_string()).into())
}

/// The post `raw_id`, provided it was written by `username`.
pub(super) async fn load_post<S>(
  store: &S,
  username: &str,
  raw_id: &str,
) -> Result<Post, Error>
where
  S: BlogStore,
{
  let missing = || Error::NotFound(format!("post not found: {username}/{raw_id}"));
  let post_id: PostId = raw_id.parse().map_err(|_| missing())?;
  store
    .get_post(post_id)
    .await
    .map_err(Error::store)?
    .filter(|post| post.author == username)
    .ok_or_else(missing)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn raw_post_url_escapes_segments() {
    assert_eq!(raw_post_url("alice", "999"), "/alice/999/");
    assert_eq!(raw_post_url("alice", "a b\n"), "/alice/a%20b%0A/");
  }
}
