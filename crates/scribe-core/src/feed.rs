//! Feed Query Engine.
//!
//! A feed is the reverse-chronological list of posts under some
//! [`FeedScope`], sliced into fixed-size pages. The engine asks the store for
//! the scope's size, resolves the requested page against it, and fetches just
//! that window.

use crate::{
  Error, Result,
  group::GroupId,
  pagination::{Page, PageSelector, Paginator},
  post::Post,
  store::BlogStore,
  user::UserId,
};

/// Which posts belong to a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedScope {
  /// Every post (the home feed).
  All,
  /// Posts filed under one group.
  Group(GroupId),
  /// Posts written by one author.
  Author(UserId),
  /// Posts written by any author the given user follows.
  FollowedBy(UserId),
}

/// Fetch one page of the feed for `scope`.
pub async fn page<S>(
  store: &S,
  scope: FeedScope,
  selector: PageSelector,
  per_page: usize,
) -> Result<Page<Post>>
where
  S: BlogStore,
{
  let count = store.count_posts(scope).await.map_err(Error::store)?;
  let paginator = Paginator::new(count, per_page);
  let number = paginator.resolve(selector);
  let (offset, limit) = paginator.window(number);

  let items = if limit == 0 {
    Vec::new()
  } else {
    store
      .list_posts(scope, limit, offset)
      .await
      .map_err(Error::store)?
  };

  Ok(paginator.page(number, items))
}
