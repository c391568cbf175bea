//! Feed pages.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/` | every post; served from the page cache |
//! | `GET`  | `/group/{slug}/` | 404 if the group does not exist |
//! | `GET`  | `/follow/` | posts by authors the viewer follows |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::header,
  response::{IntoResponse, Response},
};
use bytes::Bytes;
use scribe_core::{
  feed::{self, FeedScope},
  group::Group,
  pagination::{Page, PageSelector},
  post::Post,
  store::BlogStore,
};
use serde::Serialize;

use super::PageParams;
use crate::{
  AppState,
  auth::{MaybeUser, RequireUser},
  error::Error,
};

const INDEX_CACHE_PREFIX: &str = "index_page:";

#[derive(Serialize)]
pub struct FeedView {
  pub page: Page<Post>,
}

#[derive(Serialize)]
pub struct GroupView {
  pub group: Group,
  pub page:  Page<Post>,
}

// ─── Home ─────────────────────────────────────────────────────────────────────

/// `GET /[?page=<n>]`
pub async fn index<S>(
  State(state): State<AppState<S>>,
  _viewer: MaybeUser,
  Query(params): Query<PageParams>,
) -> Result<Response, Error>
where
  S: BlogStore + 'static,
{
  let selector = params.selector();
  let key = index_cache_key(selector);
  if let Some(body) = state.index_cache.get(&key).await {
    return Ok(json_body(body));
  }

  let page = feed::page(
    state.store.as_ref(),
    FeedScope::All,
    selector,
    state.config.page_size,
  )
  .await?;
  let body = Bytes::from(serde_json::to_vec(&FeedView { page })?);
  state.index_cache.insert(key, body.clone()).await;
  Ok(json_body(body))
}

/// Selectors that resolve to the first page share one key.
fn index_cache_key(selector: PageSelector) -> String {
  match selector {
    PageSelector::Number(n) if n > 1 => format!("{INDEX_CACHE_PREFIX}{n}"),
    _ => format!("{INDEX_CACHE_PREFIX}1"),
  }
}

fn json_body(body: Bytes) -> Response {
  ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

// ─── Group ────────────────────────────────────────────────────────────────────

/// `GET /group/{slug}/[?page=<n>]`
pub async fn group_posts<S>(
  State(state): State<AppState<S>>,
  _viewer: MaybeUser,
  Path(slug): Path<String>,
  Query(params): Query<PageParams>,
) -> Result<Json<GroupView>, Error>
where
  S: BlogStore + 'static,
{
  let group = state
    .store
    .get_group_by_slug(&slug)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::from(scribe_core::Error::GroupNotFound(slug.clone())))?;

  let page = feed::page(
    state.store.as_ref(),
    FeedScope::Group(group.group_id),
    params.selector(),
    state.config.page_size,
  )
  .await?;
  Ok(Json(GroupView { group, page }))
}

// ─── Followed authors ─────────────────────────────────────────────────────────

/// `GET /follow/[?page=<n>]`
pub async fn follow_index<S>(
  State(state): State<AppState<S>>,
  RequireUser(viewer): RequireUser,
  Query(params): Query<PageParams>,
) -> Result<Json<FeedView>, Error>
where
  S: BlogStore + 'static,
{
  let page = feed::page(
    state.store.as_ref(),
    FeedScope::FollowedBy(viewer.user_id),
    params.selector(),
    state.config.page_size,
  )
  .await?;
  Ok(Json(FeedView { page }))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn first_page_selectors_share_a_key() {
    for selector in [
      PageSelector::First,
      PageSelector::Number(1),
      PageSelector::Number(0),
      PageSelector::Number(-7),
      PageSelector::parse(Some("junk")),
    ] {
      assert_eq!(index_cache_key(selector), "index_page:1");
    }
    assert_eq!(index_cache_key(PageSelector::Number(3)), "index_page:3");
  }
}
