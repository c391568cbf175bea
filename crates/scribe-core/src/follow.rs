//! Follow Graph: directed `follower → author` edges.
//!
//! An edge means the follower receives the author's posts in their
//! [`FeedScope::FollowedBy`](crate::feed::FeedScope::FollowedBy) feed.

use serde::Serialize;

use crate::{
  Error, Result,
  store::BlogStore,
  user::{User, UserId},
};

/// Follower and following counts shown on a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FollowCounts {
  pub followers: usize,
  pub following: usize,
}

pub async fn is_following<S>(store: &S, follower: UserId, author: UserId) -> Result<bool>
where
  S: BlogStore,
{
  if follower == author {
    return Ok(false);
  }
  store
    .follow_exists(follower, author)
    .await
    .map_err(Error::store)
}

/// Create the edge `follower → author`.
///
/// Following yourself, or someone you already follow, is a no-op. Returns
/// whether an edge was created.
pub async fn follow<S>(store: &S, follower: UserId, author: UserId) -> Result<bool>
where
  S: BlogStore,
{
  if follower == author {
    return Ok(false);
  }
  store
    .insert_follow(follower, author)
    .await
    .map_err(Error::store)
}

/// Remove the edge `follower → author`; [`Error::FollowNotFound`] if absent.
pub async fn unfollow<S>(store: &S, follower: UserId, author: UserId) -> Result<()>
where
  S: BlogStore,
{
  let removed = store
    .delete_follow(follower, author)
    .await
    .map_err(Error::store)?;
  if removed {
    Ok(())
  } else {
    Err(Error::FollowNotFound { follower, author })
  }
}

/// Every author `follower` follows.
pub async fn following<S>(store: &S, follower: UserId) -> Result<Vec<User>>
where
  S: BlogStore,
{
  store.list_following(follower).await.map_err(Error::store)
}

pub async fn counts<S>(store: &S, user: UserId) -> Result<FollowCounts>
where
  S: BlogStore,
{
  Ok(FollowCounts {
    followers: store.count_followers(user).await.map_err(Error::store)?,
    following: store.count_following(user).await.map_err(Error::store)?,
  })
}
