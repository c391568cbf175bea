//! HTTP layer for Scribe.
//!
//! Exposes an axum [`Router`] serving the feeds, profiles, posts, comments and
//! follow actions over JSON, backed by any [`BlogStore`].

pub mod auth;
pub mod cache;
pub mod error;
pub mod handlers;

pub use error::Error;

use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::{Router, http::Uri, routing::{get, post}};
use scribe_core::{pagination::PAGE_SIZE, store::BlogStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use cache::PageCache;
use handlers::{accounts, comments, feeds, posts, profile};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `SCRIBE_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                 String,
  pub port:                 u16,
  pub store_path:           PathBuf,
  /// Posts and comments per page.
  pub page_size:            usize,
  /// Lifetime of a cached home-feed page; `0` disables the cache.
  pub index_cache_ttl_secs: u64,
  /// Where anonymous requests to protected pages are sent.
  pub login_url:            String,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                 "127.0.0.1".to_string(),
      port:                 8000,
      store_path:           PathBuf::from("scribe.db"),
      page_size:            PAGE_SIZE,
      index_cache_ttl_secs: 20,
      login_url:            "/auth/login/".to_string(),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub store:       Arc<S>,
  pub config:      Arc<ServerConfig>,
  pub index_cache: Arc<PageCache>,
}

impl<S> AppState<S> {
  pub fn new(store: S, config: ServerConfig) -> Self {
    let ttl = Duration::from_secs(config.index_cache_ttl_secs);
    Self {
      store:       Arc::new(store),
      config:      Arc::new(config),
      index_cache: Arc::new(PageCache::new(ttl)),
    }
  }
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:       Arc::clone(&self.store),
      config:      Arc::clone(&self.config),
      index_cache: Arc::clone(&self.index_cache),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the application router.
///
/// Static first segments (`group`, `follow`, `new`, `auth`) take priority over
/// `{username}`; those names are reserved at signup.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: BlogStore + 'static,
{
  Router::new()
    // Feeds
    .route("/",               get(feeds::index::<S>))
    .route("/group/{slug}/",  get(feeds::group_posts::<S>))
    .route("/follow/",        get(feeds::follow_index::<S>))
    // Authoring
    .route("/new/",           get(posts::new_post_form::<S>).post(posts::new_post::<S>))
    // Accounts
    .route("/auth/signup/",   post(accounts::signup::<S>))
    .route("/auth/login/",    get(accounts::login::<S>))
    // Profiles
    .route("/{username}/",            get(profile::profile::<S>))
    .route("/{username}/follow/",     get(profile::follow::<S>).post(profile::follow::<S>))
    .route("/{username}/unfollow/",   get(profile::unfollow::<S>).post(profile::unfollow::<S>))
    // Posts
    .route("/{username}/{post_id}/",          get(posts::post_view::<S>))
    .route("/{username}/{post_id}/edit/",     get(posts::edit_form::<S>).post(posts::edit::<S>))
    .route("/{username}/{post_id}/comment/",  get(comments::back_to_post::<S>).post(comments::add_comment::<S>))
    .fallback(not_found)
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

async fn not_found(uri: Uri) -> Error {
  Error::NotFound(format!("no page at {}", uri.path()))
}

#[cfg(test)]
pub(crate) mod test_support;
