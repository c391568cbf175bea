//! SQL schema for the Scribe SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       INTEGER PRIMARY KEY AUTOINCREMENT,
    username      TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,     -- argon2 PHC string
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS blog_groups (
    group_id    INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    slug        TEXT NOT NULL UNIQUE,
    description TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS posts (
    post_id    INTEGER PRIMARY KEY AUTOINCREMENT,
    text       TEXT NOT NULL,
    created_at TEXT NOT NULL,        -- fixed-width RFC 3339 UTC; server-assigned
    author_id  INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    group_id   INTEGER REFERENCES blog_groups(group_id) ON DELETE SET NULL,
    image      TEXT
);

CREATE TABLE IF NOT EXISTS comments (
    comment_id INTEGER PRIMARY KEY AUTOINCREMENT,
    post_id    INTEGER NOT NULL REFERENCES posts(post_id) ON DELETE CASCADE,
    author_id  INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    text       TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- user_id follows author_id.
CREATE TABLE IF NOT EXISTS follows (
    follow_id  INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id    INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    author_id  INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    created_at TEXT NOT NULL,
    UNIQUE (user_id, author_id),
    CHECK  (user_id != author_id)
);

CREATE INDEX IF NOT EXISTS posts_created_idx   ON posts(created_at DESC, post_id DESC);
CREATE INDEX IF NOT EXISTS posts_author_idx    ON posts(author_id);
CREATE INDEX IF NOT EXISTS posts_group_idx     ON posts(group_id);
CREATE INDEX IF NOT EXISTS comments_post_idx   ON comments(post_id, created_at DESC);
CREATE INDEX IF NOT EXISTS follows_author_idx  ON follows(author_id);

PRAGMA user_version = 1;
";
