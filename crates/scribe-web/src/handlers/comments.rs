//! Comment submission.

use axum::{
  Json,
  extract::{Path, State},
  response::Response,
};
use scribe_core::{comment::CommentForm, store::BlogStore, thread};

use super::{found, load_post, post_url};
use crate::{AppState, auth::RequireUser, error::Error};

/// `POST /{username}/{post_id}/comment/`, body: `{"text":"..."}`
pub async fn add_comment<S>(
  State(state): State<AppState<S>>,
  RequireUser(viewer): RequireUser,
  Path((username, raw_id)): Path<(String, String)>,
  Json(form): Json<CommentForm>,
) -> Result<Response, Error>
where
  S: BlogStore + 'static,
{
  let store = state.store.as_ref();
  let post = load_post(store, &username, &raw_id).await?;

  let comment = thread::add_comment(store, post.post_id, viewer.user_id, form).await?;
  tracing::info!(
    comment_id = comment.comment_id,
    post_id = post.post_id,
    author = %viewer.username,
    "comment added"
  );
  Ok(found(&post_url(&post.author, post.post_id)))
}

/// `GET /{username}/{post_id}/comment/` only leads back to the post.
pub async fn back_to_post<S>(
  State(state): State<AppState<S>>,
  RequireUser(_viewer): RequireUser,
  Path((username, raw_id)): Path<(String, String)>,
) -> Result<Response, Error>
where
  S: BlogStore + 'static,
{
  let post = load_post(state.store.as_ref(), &username, &raw_id).await?;
  Ok(found(&post_url(&post.author, post.post_id)))
}
