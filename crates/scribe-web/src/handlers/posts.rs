//! Single-post pages and post authoring.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/{username}/{post_id}/` | post, author and a page of comments |
//! | `GET`  | `/new/` | group choices for a new post |
//! | `POST` | `/new/` | body: `{"text":"...","group":1,"image":"a.png"}` |
//! | `GET`  | `/{username}/{post_id}/edit/` | post and group choices; author only |
//! | `POST` | `/{username}/{post_id}/edit/` | same body as `/new/`; author only |

use axum::{
  Json,
  extract::{Path, Query, State},
  response::{IntoResponse, Response},
};
use scribe_core::{
  authoring,
  comment::Comment,
  follow::{self, FollowCounts},
  group::Group,
  pagination::Page,
  post::{Post, PostForm},
  store::BlogStore,
  thread,
  user::User,
};
use serde::Serialize;

use super::{PageParams, found, load_author, load_post, post_url, raw_post_url};
use crate::{
  AppState,
  auth::{MaybeUser, RequireUser},
  error::Error,
};

#[derive(Serialize)]
pub struct PostView {
  pub post:      Post,
  pub author:    User,
  pub counts:    FollowCounts,
  pub following: bool,
  pub comments:  Page<Comment>,
}

#[derive(Serialize)]
pub struct PostFormView {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub post:   Option<Post>,
  pub groups: Vec<Group>,
}

// ─── View ─────────────────────────────────────────────────────────────────────

/// `GET /{username}/{post_id}/[?page=<n>]`
pub async fn post_view<S>(
  State(state): State<AppState<S>>,
  MaybeUser(viewer): MaybeUser,
  Path((username, raw_id)): Path<(String, String)>,
  Query(params): Query<PageParams>,
) -> Result<Json<PostView>, Error>
where
  S: BlogStore + 'static,
{
  let store = state.store.as_ref();
  let post = load_post(store, &username, &raw_id).await?;
  let author = load_author(store, &post.author).await?;

  let following = match &viewer {
    Some(viewer) => follow::is_following(store, viewer.user_id, author.user_id).await?,
    None => false,
  };
  let counts = follow::counts(store, author.user_id).await?;
  let comments = thread::list_comments(
    store,
    post.post_id,
    params.selector(),
    state.config.page_size,
  )
  .await?;

  Ok(Json(PostView { post, author, counts, following, comments }))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `GET /new/`
pub async fn new_post_form<S>(
  State(state): State<AppState<S>>,
  RequireUser(_viewer): RequireUser,
) -> Result<Json<PostFormView>, Error>
where
  S: BlogStore + 'static,
{
  let groups = state.store.list_groups().await.map_err(Error::store)?;
  Ok(Json(PostFormView { post: None, groups }))
}

/// `POST /new/`
pub async fn new_post<S>(
  State(state): State<AppState<S>>,
  RequireUser(viewer): RequireUser,
  Json(form): Json<PostForm>,
) -> Result<Response, Error>
where
  S: BlogStore + 'static,
{
  let post = authoring::create_post(state.store.as_ref(), viewer.user_id, form).await?;
  state.index_cache.invalidate().await;
  tracing::info!(post_id = post.post_id, author = %viewer.username, "post created");
  Ok(found("/"))
}

// ─── Edit ─────────────────────────────────────────────────────────────────────

/// `GET /{username}/{post_id}/edit/`
pub async fn edit_form<S>(
  State(state): State<AppState<S>>,
  RequireUser(viewer): RequireUser,
  Path((username, raw_id)): Path<(String, String)>,
) -> Result<Response, Error>
where
  S: BlogStore + 'static,
{
  if viewer.username != username {
    return Ok(found(&raw_post_url(&username, &raw_id)));
  }
  let store = state.store.as_ref();
  let post = load_post(store, &username, &raw_id).await?;

  let groups = store.list_groups().await.map_err(Error::store)?;
  Ok(Json(PostFormView { post: Some(post), groups }).into_response())
}

/// `POST /{username}/{post_id}/edit/`
///
/// Anyone but the author is sent back to the post unchanged, whether or not
/// the post exists.
pub async fn edit<S>(
  State(state): State<AppState<S>>,
  RequireUser(viewer): RequireUser,
  Path((username, raw_id)): Path<(String, String)>,
  Json(form): Json<PostForm>,
) -> Result<Response, Error>
where
  S: BlogStore + 'static,
{
  if viewer.username != username {
    return Ok(found(&raw_post_url(&username, &raw_id)));
  }
  let store = state.store.as_ref();
  let post = load_post(store, &username, &raw_id).await?;

  let post = authoring::edit_post(store, viewer.user_id, post.post_id, form).await?;
  state.index_cache.invalidate().await;
  tracing::info!(post_id = post.post_id, author = %viewer.username, "post edited");
  Ok(found(&post_url(&post.author, post.post_id)))
}
