//! [`SqliteStore`], the SQLite implementation of [`BlogStore`].

use std::path::Path;

use rusqlite::{ErrorCode, OptionalExtension as _, types::Value};
use scribe_core::{
  comment::{Comment, CommentId, NewComment},
  feed::FeedScope,
  group::{Group, GroupId, NewGroup},
  post::{NewPost, Post, PostChanges, PostId},
  store::BlogStore,
  user::{User, UserId},
};

use crate::{
  Error, Result,
  encode::{
    COMMENT_SELECT, POST_SELECT, RawComment, RawPost, RawUser, USER_COLUMNS,
    decode_count, encode_dt, encode_usize, now,
  },
  schema::SCHEMA,
};

/// Newest first; the id breaks ties between equal timestamps.
const POST_ORDER: &str = "ORDER BY p.created_at DESC, p.post_id DESC";
const COMMENT_ORDER: &str = "ORDER BY c.created_at DESC, c.comment_id DESC";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Scribe blog store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

fn is_constraint_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(f, _) if f.code == ErrorCode::ConstraintViolation
  )
}

/// Join/`WHERE` fragment and its bound id for a feed scope.
fn scope_filter(scope: FeedScope) -> (&'static str, Vec<i64>) {
  match scope {
    FeedScope::All => ("", vec![]),
    FeedScope::Group(id) => ("WHERE p.group_id = ?", vec![id]),
    FeedScope::Author(id) => ("WHERE p.author_id = ?", vec![id]),
    FeedScope::FollowedBy(id) => (
      "JOIN follows f ON f.author_id = p.author_id WHERE f.user_id = ?",
      vec![id],
    ),
  }
}

fn group_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Group> {
  Ok(Group {
    group_id:    row.get(0)?,
    title:       row.get(1)?,
    slug:        row.get(2)?,
    description: row.get(3)?,
  })
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    let version: i64 = self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(conn.query_row("PRAGMA user_version", [], |r| r.get(0))?)
      })
      .await?;
    tracing::debug!(version, "sqlite schema ready");
    Ok(())
  }

  async fn fetch_group(&self, column: &'static str, key: Value) -> Result<Option<Group>> {
    let group = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT group_id, title, slug, description FROM blog_groups
               WHERE {column} = ?1"
            ),
            rusqlite::params![key],
            group_from_row,
          )
          .optional()?)
      })
      .await?;
    Ok(group)
  }

  async fn fetch_user(&self, username: String) -> Result<Option<(User, String)>> {
    let raw: Option<(RawUser, String)> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {USER_COLUMNS}, u.password_hash FROM users u WHERE u.username = ?1"),
            rusqlite::params![username],
            |row| Ok((RawUser::from_row(row, 0)?, row.get(3)?)),
          )
          .optional()?)
      })
      .await?;

    match raw {
      Some((user, hash)) => Ok(Some((user.into_user()?, hash))),
      None => Ok(None),
    }
  }

  /// `DELETE FROM <table> WHERE <column> = id`; reports whether a row went.
  async fn delete_by_id(&self, table: &'static str, column: &'static str, id: i64) -> Result<bool> {
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          &format!("DELETE FROM {table} WHERE {column} = ?1"),
          rusqlite::params![id],
        )?)
      })
      .await?;
    Ok(removed > 0)
  }

  async fn count(&self, sql: String, args: Vec<i64>) -> Result<usize> {
    let n: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(&sql, rusqlite::params_from_iter(args), |r| r.get(0))?)
      })
      .await?;
    Ok(decode_count(n))
  }
}

// ─── BlogStore impl ──────────────────────────────────────────────────────────

impl BlogStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, username: String, password_hash: String) -> Result<User> {
    let created_at = now();
    let at_str     = encode_dt(created_at);
    let name       = username.clone();

    let user_id: Option<i64> = self
      .conn
      .call(move |conn| {
        match conn.execute(
          "INSERT INTO users (username, password_hash, created_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![name, password_hash, at_str],
        ) {
          Ok(_) => Ok(Some(conn.last_insert_rowid())),
          Err(e) if is_constraint_violation(&e) => Ok(None),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    let user_id = user_id.ok_or_else(|| Error::UsernameTaken(username.clone()))?;
    tracing::debug!(user_id, %username, "user created");
    Ok(User { user_id, username, created_at })
  }

  async fn get_user(&self, id: UserId) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users u WHERE u.user_id = ?1"),
            rusqlite::params![id],
            |row| RawUser::from_row(row, 0),
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
    Ok(self.fetch_user(username.to_owned()).await?.map(|(user, _)| user))
  }

  async fn get_credentials(&self, username: &str) -> Result<Option<(User, String)>> {
    self.fetch_user(username.to_owned()).await
  }

  async fn delete_user(&self, id: UserId) -> Result<bool> {
    self.delete_by_id("users", "user_id", id).await
  }

  // ── Groups ────────────────────────────────────────────────────────────────

  async fn create_group(&self, group: NewGroup) -> Result<Group> {
    let NewGroup { title, slug, description } = group;
    let (t, s, d) = (title.clone(), slug.clone(), description.clone());

    let group_id: Option<i64> = self
      .conn
      .call(move |conn| {
        match conn.execute(
          "INSERT INTO blog_groups (title, slug, description) VALUES (?1, ?2, ?3)",
          rusqlite::params![t, s, d],
        ) {
          Ok(_) => Ok(Some(conn.last_insert_rowid())),
          Err(e) if is_constraint_violation(&e) => Ok(None),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    let group_id = group_id.ok_or_else(|| Error::SlugTaken(slug.clone()))?;
    tracing::debug!(group_id, %slug, "group created");
    Ok(Group { group_id, title, slug, description })
  }

  async fn get_group(&self, id: GroupId) -> Result<Option<Group>> {
    self.fetch_group("group_id", Value::Integer(id)).await
  }

  async fn get_group_by_slug(&self, slug: &str) -> Result<Option<Group>> {
    self.fetch_group("slug", Value::Text(slug.to_owned())).await
  }

  async fn list_groups(&self) -> Result<Vec<Group>> {
    let groups = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT group_id, title, slug, description FROM blog_groups
           ORDER BY title, group_id",
        )?;
        let rows = stmt
          .query_map([], group_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(groups)
  }

  async fn update_group(&self, id: GroupId, group: NewGroup) -> Result<Option<Group>> {
    let NewGroup { title, slug, description } = group;
    let (t, s, d) = (title.clone(), slug.clone(), description.clone());

    let changed: Option<usize> = self
      .conn
      .call(move |conn| {
        match conn.execute(
          "UPDATE blog_groups SET title = ?1, slug = ?2, description = ?3
           WHERE group_id = ?4",
          rusqlite::params![t, s, d, id],
        ) {
          Ok(n) => Ok(Some(n)),
          Err(e) if is_constraint_violation(&e) => Ok(None),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    match changed {
      None => Err(Error::SlugTaken(slug)),
      Some(0) => Ok(None),
      Some(_) => Ok(Some(Group { group_id: id, title, slug, description })),
    }
  }

  async fn delete_group(&self, id: GroupId) -> Result<bool> {
    self.delete_by_id("blog_groups", "group_id", id).await
  }

  // ── Posts ─────────────────────────────────────────────────────────────────

  async fn create_post(&self, post: NewPost) -> Result<Post> {
    let at_str = encode_dt(now());

    let post_id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO posts (text, created_at, author_id, group_id, image)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![post.text, at_str, post.author_id, post.group_id, post.image],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    tracing::debug!(post_id, "post created");
    // Read back through the join so author and group slug are filled in.
    self
      .get_post(post_id)
      .await?
      .ok_or(Error::Vanished { table: "posts", id: post_id })
  }

  async fn get_post(&self, id: PostId) -> Result<Option<Post>> {
    let raw: Option<RawPost> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("{POST_SELECT} WHERE p.post_id = ?1"),
            rusqlite::params![id],
            RawPost::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawPost::into_post).transpose()
  }

  async fn update_post(&self, id: PostId, changes: PostChanges) -> Result<Option<Post>> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE posts SET text = ?1, group_id = ?2, image = ?3 WHERE post_id = ?4",
          rusqlite::params![changes.text, changes.group_id, changes.image, id],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.get_post(id).await
  }

  async fn delete_post(&self, id: PostId) -> Result<bool> {
    self.delete_by_id("posts", "post_id", id).await
  }

  async fn count_posts(&self, scope: FeedScope) -> Result<usize> {
    let (filter, args) = scope_filter(scope);
    self
      .count(format!("SELECT COUNT(*) FROM posts p {filter}"), args)
      .await
  }

  async fn list_posts(&self, scope: FeedScope, limit: usize, offset: usize) -> Result<Vec<Post>> {
    let (filter, mut args) = scope_filter(scope);
    args.push(encode_usize(limit)?);
    args.push(encode_usize(offset)?);
    let sql = format!("{POST_SELECT} {filter} {POST_ORDER} LIMIT ? OFFSET ?");

    let raws: Vec<RawPost> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(args), RawPost::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPost::into_post).collect()
  }

  // ── Comments ──────────────────────────────────────────────────────────────

  async fn create_comment(&self, comment: NewComment) -> Result<Comment> {
    let at_str = encode_dt(now());

    let comment_id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO comments (post_id, author_id, text, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![comment.post_id, comment.author_id, comment.text, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    tracing::debug!(comment_id, "comment created");
    self
      .get_comment(comment_id)
      .await?
      .ok_or(Error::Vanished { table: "comments", id: comment_id })
  }

  async fn get_comment(&self, id: CommentId) -> Result<Option<Comment>> {
    let raw: Option<RawComment> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("{COMMENT_SELECT} WHERE c.comment_id = ?1"),
            rusqlite::params![id],
            RawComment::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawComment::into_comment).transpose()
  }

  async fn update_comment(&self, id: CommentId, text: String) -> Result<Option<Comment>> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE comments SET text = ?1 WHERE comment_id = ?2",
          rusqlite::params![text, id],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.get_comment(id).await
  }

  async fn delete_comment(&self, id: CommentId) -> Result<bool> {
    self.delete_by_id("comments", "comment_id", id).await
  }

  async fn count_comments(&self, post: PostId) -> Result<usize> {
    self
      .count("SELECT COUNT(*) FROM comments WHERE post_id = ?".to_owned(), vec![post])
      .await
  }

  async fn list_comments(&self, post: PostId, limit: usize, offset: usize) -> Result<Vec<Comment>> {
    let limit  = encode_usize(limit)?;
    let offset = encode_usize(offset)?;

    let raws: Vec<RawComment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "{COMMENT_SELECT} WHERE c.post_id = ?1 {COMMENT_ORDER} LIMIT ?2 OFFSET ?3"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![post, limit, offset], RawComment::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawComment::into_comment).collect()
  }

  // ── Follow edges ──────────────────────────────────────────────────────────

  async fn insert_follow(&self, follower: UserId, author: UserId) -> Result<bool> {
    if follower == author {
      return Ok(false);
    }
    let at_str = encode_dt(now());

    let inserted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT OR IGNORE INTO follows (user_id, author_id, created_at)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![follower, author, at_str],
        )?)
      })
      .await?;
    Ok(inserted > 0)
  }

  async fn delete_follow(&self, follower: UserId, author: UserId) -> Result<bool> {
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM follows WHERE user_id = ?1 AND author_id = ?2",
          rusqlite::params![follower, author],
        )?)
      })
      .await?;
    Ok(removed > 0)
  }

  async fn follow_exists(&self, follower: UserId, author: UserId) -> Result<bool> {
    let n = self
      .count(
        "SELECT COUNT(*) FROM follows WHERE user_id = ? AND author_id = ?".to_owned(),
        vec![follower, author],
      )
      .await?;
    Ok(n > 0)
  }

  async fn list_following(&self, follower: UserId) -> Result<Vec<User>> {
    let raws: Vec<RawUser> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {USER_COLUMNS} FROM users u
           JOIN follows f ON f.author_id = u.user_id
           WHERE f.user_id = ?1
           ORDER BY u.username"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![follower], |row| RawUser::from_row(row, 0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_user).collect()
  }

  async fn count_followers(&self, author: UserId) -> Result<usize> {
    self
      .count("SELECT COUNT(*) FROM follows WHERE author_id = ?".to_owned(), vec![author])
      .await
  }

  async fn count_following(&self, follower: UserId) -> Result<usize> {
    self
      .count("SELECT COUNT(*) FROM follows WHERE user_id = ?".to_owned(), vec![follower])
      .await
  }
}
