//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with a fixed microsecond width
//! and a `Z` suffix, so ordering by the text column is chronological.

use chrono::{DateTime, SecondsFormat, Utc};
use scribe_core::{comment::Comment, post::Post, user::User};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

/// Current time truncated to what [`encode_dt`] keeps, so a value returned
/// from a write compares equal to the same value read back.
pub fn now() -> DateTime<Utc> {
  let now = Utc::now();
  DateTime::from_timestamp_micros(now.timestamp_micros()).unwrap_or(now)
}

// ─── Integers ────────────────────────────────────────────────────────────────

pub fn encode_usize(n: usize) -> Result<i64> {
  i64::try_from(n).map_err(|_| Error::OutOfRange(n))
}

pub fn decode_count(n: i64) -> usize { usize::try_from(n).unwrap_or(0) }

// ─── Row types ───────────────────────────────────────────────────────────────

pub const USER_COLUMNS: &str = "u.user_id, u.username, u.created_at";

/// Raw values read from a `users` row.
pub struct RawUser {
  pub user_id:    i64,
  pub username:   String,
  pub created_at: String,
}

impl RawUser {
  /// Reads [`USER_COLUMNS`] starting at column `at`.
  pub fn from_row(row: &rusqlite::Row<'_>, at: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:    row.get(at)?,
      username:   row.get(at + 1)?,
      created_at: row.get(at + 2)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:    self.user_id,
      username:   self.username,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Posts joined with their author and (optional) group.
pub const POST_SELECT: &str = "
SELECT p.post_id, p.text, p.created_at, p.author_id, u.username,
       p.group_id, g.slug, p.image
FROM posts p
JOIN users u ON u.user_id = p.author_id
LEFT JOIN blog_groups g ON g.group_id = p.group_id";

/// Raw values read from a [`POST_SELECT`] row.
pub struct RawPost {
  pub post_id:    i64,
  pub text:       String,
  pub created_at: String,
  pub author_id:  i64,
  pub author:     String,
  pub group_id:   Option<i64>,
  pub group_slug: Option<String>,
  pub image:      Option<String>,
}

impl RawPost {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      post_id:    row.get(0)?,
      text:       row.get(1)?,
      created_at: row.get(2)?,
      author_id:  row.get(3)?,
      author:     row.get(4)?,
      group_id:   row.get(5)?,
      group_slug: row.get(6)?,
      image:      row.get(7)?,
    })
  }

  pub fn into_post(self) -> Result<Post> {
    Ok(Post {
      post_id:    self.post_id,
      text:       self.text,
      created_at: decode_dt(&self.created_at)?,
      author_id:  self.author_id,
      author:     self.author,
      group_id:   self.group_id,
      group_slug: self.group_slug,
      image:      self.image,
    })
  }
}

/// Comments joined with their author.
pub const COMMENT_SELECT: &str = "
SELECT c.comment_id, c.post_id, c.author_id, u.username, c.text, c.created_at
FROM comments c
JOIN users u ON u.user_id = c.author_id";

/// Raw values read from a [`COMMENT_SELECT`] row.
pub struct RawComment {
  pub comment_id: i64,
  pub post_id:    i64,
  pub author_id:  i64,
  pub author:     String,
  pub text:       String,
  pub created_at: String,
}

impl RawComment {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      comment_id: row.get(0)?,
      post_id:    row.get(1)?,
      author_id:  row.get(2)?,
      author:     row.get(3)?,
      text:       row.get(4)?,
      created_at: row.get(5)?,
    })
  }

  pub fn into_comment(self) -> Result<Comment> {
    Ok(Comment {
      comment_id: self.comment_id,
      post_id:    self.post_id,
      author_id:  self.author_id,
      author:     self.author,
      text:       self.text,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn encoded_timestamps_sort_chronologically() {
    let a = DateTime::parse_from_rfc3339("2024-01-01T00:00:09Z")
      .unwrap()
      .with_timezone(&Utc);
    let b = DateTime::parse_from_rfc3339("2024-01-01T00:00:10.5Z")
      .unwrap()
      .with_timezone(&Utc);
    let (ea, eb) = (encode_dt(a), encode_dt(b));
    assert_eq!(ea.len(), eb.len());
    assert!(ea < eb);
    assert_eq!(decode_dt(&eb).unwrap(), b);
  }

  #[test]
  fn now_survives_round_trip() {
    let t = now();
    assert_eq!(decode_dt(&encode_dt(t)).unwrap(), t);
  }
}
