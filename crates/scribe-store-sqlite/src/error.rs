//! Error type for `scribe-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("username already taken: {0}")]
  UsernameTaken(String),

  #[error("group slug already taken: {0}")]
  SlugTaken(String),

  /// A row written a moment ago could not be read back.
  #[error("{table} row {id} vanished after insert")]
  Vanished { table: &'static str, id: i64 },

  /// A count or window that does not fit SQLite's signed 64-bit integers.
  #[error("value out of range: {0}")]
  OutOfRange(usize),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
