//! Author profiles and the follow/unfollow actions.

use axum::{
  Json,
  extract::{Path, Query, State},
  response::Response,
};
use scribe_core::{
  feed::{self, FeedScope},
  follow::{self, FollowCounts},
  pagination::Page,
  post::Post,
  store::BlogStore,
  user::User,
};
use serde::Serialize;

use super::{PageParams, found, load_author, profile_url};
use crate::{
  AppState,
  auth::{MaybeUser, RequireUser},
  error::Error,
};

#[derive(Serialize)]
pub struct ProfileView {
  pub author:    User,
  pub counts:    FollowCounts,
  /// Whether the viewer follows `author`; `false` for anonymous viewers.
  pub following: bool,
  pub page:      Page<Post>,
}

/// `GET /{username}/[?page=<n>]`
pub async fn profile<S>(
  State(state): State<AppState<S>>,
  MaybeUser(viewer): MaybeUser,
  Path(username): Path<String>,
  Query(params): Query<PageParams>,
) -> Result<Json<ProfileView>, Error>
where
  S: BlogStore + 'static,
{
  let store = state.store.as_ref();
  let author = load_author(store, &username).await?;

  let following = match &viewer {
    Some(viewer) => follow::is_following(store, viewer.user_id, author.user_id).await?,
    None => false,
  };
  let counts = follow::counts(store, author.user_id).await?;
  let page = feed::page(
    store,
    FeedScope::Author(author.user_id),
    params.selector(),
    state.config.page_size,
  )
  .await?;

  Ok(Json(ProfileView { author, counts, following, page }))
}

/// `GET|POST /{username}/follow/`
pub async fn follow<S>(
  State(state): State<AppState<S>>,
  RequireUser(viewer): RequireUser,
  Path(username): Path<String>,
) -> Result<Response, Error>
where
  S: BlogStore + 'static,
{
  let store = state.store.as_ref();
  let author = load_author(store, &username).await?;

  if follow::follow(store, viewer.user_id, author.user_id).await? {
    tracing::info!(follower = %viewer.username, author = %author.username, "followed");
  }
  Ok(found(&profile_url(&author.username)))
}

/// `GET|POST /{username}/unfollow/`; 404 unless the viewer follows `username`.
pub async fn unfollow<S>(
  State(state): State<AppState<S>>,
  RequireUser(viewer): RequireUser,
  Path(username): Path<String>,
) -> Result<Response, Error>
where
  S: BlogStore + 'static,
{
  let store = state.store.as_ref();
  let author = load_author(store, &username).await?;

  follow::unfollow(store, viewer.user_id, author.user_id).await?;
  tracing::info!(follower = %viewer.username, author = %author.username, "unfollowed");
  Ok(found(&profile_url(&author.username)))
}
