//! The `BlogStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `scribe-store-sqlite`).
//! The feed, follow-graph and comment-thread logic in this crate, and the
//! HTTP layer in `scribe-web`, depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use crate::{
  comment::{Comment, CommentId, NewComment},
  feed::FeedScope,
  group::{Group, GroupId, NewGroup},
  post::{NewPost, Post, PostChanges, PostId},
  user::{User, UserId},
};

/// Abstraction over a Scribe storage backend.
///
/// Relational integrity is the backend's job:
/// - deleting a user removes their posts, comments and follow edges;
/// - deleting a group keeps its posts but clears their group;
/// - deleting a post removes its comments;
/// - a follow edge is unique per `(follower, author)` pair and never loops.
///
/// Listings are ordered newest first (creation time, then id, descending).
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait BlogStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a new user. Fails if the username is taken.
  fn create_user(
    &self,
    username: String,
    password_hash: String,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: UserId,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn get_user_by_username<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// The user together with their stored password hash (PHC string).
  fn get_credentials<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<(User, String)>, Self::Error>> + Send + 'a;

  /// Returns `false` if no such user existed.
  fn delete_user(
    &self,
    id: UserId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Groups ────────────────────────────────────────────────────────────

  /// Persist a new group. Fails if the slug is taken.
  fn create_group(
    &self,
    group: NewGroup,
  ) -> impl Future<Output = Result<Group, Self::Error>> + Send + '_;

  fn get_group(
    &self,
    id: GroupId,
  ) -> impl Future<Output = Result<Option<Group>, Self::Error>> + Send + '_;

  fn get_group_by_slug<'a>(
    &'a self,
    slug: &'a str,
  ) -> impl Future<Output = Result<Option<Group>, Self::Error>> + Send + 'a;

  /// All groups ordered by title.
  fn list_groups(
    &self,
  ) -> impl Future<Output = Result<Vec<Group>, Self::Error>> + Send + '_;

  /// Replace title, slug and description. `None` if the group is missing.
  fn update_group(
    &self,
    id: GroupId,
    group: NewGroup,
  ) -> impl Future<Output = Result<Option<Group>, Self::Error>> + Send + '_;

  /// Returns `false` if no such group existed.
  fn delete_group(
    &self,
    id: GroupId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Posts ─────────────────────────────────────────────────────────────

  /// Persist a new post. The creation timestamp is set by the store.
  fn create_post(
    &self,
    post: NewPost,
  ) -> impl Future<Output = Result<Post, Self::Error>> + Send + '_;

  fn get_post(
    &self,
    id: PostId,
  ) -> impl Future<Output = Result<Option<Post>, Self::Error>> + Send + '_;

  /// `None` if the post is missing.
  fn update_post(
    &self,
    id: PostId,
    changes: PostChanges,
  ) -> impl Future<Output = Result<Option<Post>, Self::Error>> + Send + '_;

  /// Returns `false` if no such post existed.
  fn delete_post(
    &self,
    id: PostId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Number of posts in `scope`.
  fn count_posts(
    &self,
    scope: FeedScope,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// A window of the posts in `scope`, newest first.
  fn list_posts(
    &self,
    scope: FeedScope,
    limit: usize,
    offset: usize,
  ) -> impl Future<Output = Result<Vec<Post>, Self::Error>> + Send + '_;

  // ── Comments ──────────────────────────────────────────────────────────

  /// Persist a new comment. The creation timestamp is set by the store.
  fn create_comment(
    &self,
    comment: NewComment,
  ) -> impl Future<Output = Result<Comment, Self::Error>> + Send + '_;

  fn get_comment(
    &self,
    id: CommentId,
  ) -> impl Future<Output = Result<Option<Comment>, Self::Error>> + Send + '_;

  /// Replace the comment text. `None` if the comment is missing.
  fn update_comment(
    &self,
    id: CommentId,
    text: String,
  ) -> impl Future<Output = Result<Option<Comment>, Self::Error>> + Send + '_;

  /// Returns `false` if no such comment existed.
  fn delete_comment(
    &self,
    id: CommentId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn count_comments(
    &self,
    post: PostId,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// A window of the comments on `post`, newest first.
  fn list_comments(
    &self,
    post: PostId,
    limit: usize,
    offset: usize,
  ) -> impl Future<Output = Result<Vec<Comment>, Self::Error>> + Send + '_;

  // ── Follow edges ──────────────────────────────────────────────────────

  /// Insert the edge `follower → author` unless it already exists. Returns
  /// whether a new edge was written. Self-edges are never written.
  fn insert_follow(
    &self,
    follower: UserId,
    author: UserId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Returns `false` if the edge did not exist.
  fn delete_follow(
    &self,
    follower: UserId,
    author: UserId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn follow_exists(
    &self,
    follower: UserId,
    author: UserId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Authors followed by `follower`, ordered by username.
  fn list_following(
    &self,
    follower: UserId,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  /// How many users follow `author`.
  fn count_followers(
    &self,
    author: UserId,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// How many authors `follower` follows.
  fn count_following(
    &self,
    follower: UserId,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;
}
