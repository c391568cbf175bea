//! Rendered-page cache for the home feed.
//!
//! Entries live for a fixed TTL and are dropped wholesale by
//! [`PageCache::invalidate`] whenever a post is created or edited. Every
//! insert first sweeps out expired entries; when the cache is still full the
//! oldest entry makes room.

use std::{
  collections::HashMap,
  time::{Duration, Instant},
};

use bytes::Bytes;
use tokio::sync::RwLock;

/// Upper bound on cached pages.
pub const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
struct CachedPage {
  body:        Bytes,
  inserted_at: Instant,
}

#[derive(Debug)]
pub struct PageCache {
  ttl:      Duration,
  capacity: usize,
  entries:  RwLock<HashMap<String, CachedPage>>,
}

impl PageCache {
  pub fn new(ttl: Duration) -> Self { Self::with_capacity(ttl, DEFAULT_CAPACITY) }

  /// A capacity of zero is treated as one.
  pub fn with_capacity(ttl: Duration, capacity: usize) -> Self {
    Self {
      ttl,
      capacity: capacity.max(1),
      entries: RwLock::new(HashMap::new()),
    }
  }

  /// The cached body for `key`, if present and not expired.
  pub async fn get(&self, key: &str) -> Option<Bytes> {
    {
      let entries = self.entries.read().await;
      match entries.get(key) {
        Some(page) if page.inserted_at.elapsed() < self.ttl => {
          return Some(page.body.clone());
        }
        Some(_) => {}
        None => return None,
      }
    }

    let mut entries = self.entries.write().await;
    if entries
      .get(key)
      .is_some_and(|page| page.inserted_at.elapsed() >= self.ttl)
    {
      entries.remove(key);
    }
    None
  }

  pub async fn insert(&self, key: String, body: Bytes) {
    if self.ttl.is_zero() {
      return;
    }
    let mut entries = self.entries.write().await;
    let ttl = self.ttl;
    entries.retain(|_, page| page.inserted_at.elapsed() < ttl);

    if entries.len() >= self.capacity && !entries.contains_key(&key) {
      let oldest = entries
        .iter()
        .min_by_key(|(_, page)| page.inserted_at)
        .map(|(k, _)| k.clone());
      if let Some(oldest) = oldest {
        entries.remove(&oldest);
      }
    }

    entries.insert(key, CachedPage { body, inserted_at: Instant::now() });
  }

  /// Drop every cached page.
  pub async fn invalidate(&self) {
    let mut entries = self.entries.write().await;
    if !entries.is_empty() {
      tracing::debug!(pages = entries.len(), "invalidating page cache");
      entries.clear();
    }
  }

  pub async fn len(&self) -> usize { self.entries.read().await.len() }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn hit_until_invalidated() {
    let cache = PageCache::new(Duration::from_secs(60));
    assert!(cache.get("index_page:1").await.is_none());

    cache.insert("index_page:1".into(), Bytes::from_static(b"[]")).await;
    assert_eq!(cache.get("index_page:1").await.unwrap(), "[]");
    assert!(cache.get("index_page:2").await.is_none());

    cache.invalidate().await;
    assert!(cache.get("index_page:1").await.is_none());
    assert_eq!(cache.len().await, 0);
  }

  #[tokio::test]
  async fn expired_entries_are_evicted_on_lookup() {
    let cache = PageCache::new(Duration::from_millis(10));
    cache.insert("k".into(), Bytes::from_static(b"v")).await;
    tokio::time::sleep(Duration::from_millis(30)).await;

    assert!(cache.get("k").await.is_none());
    assert_eq!(cache.len().await, 0);
  }

  #[tokio::test]
  async fn insert_sweeps_expired_entries() {
    let cache = PageCache::new(Duration::from_millis(10));
    for i in 0..20 {
      cache.insert(format!("k{i}"), Bytes::from_static(b"v")).await;
    }
    tokio::time::sleep(Duration::from_millis(30)).await;

    cache.insert("fresh".into(), Bytes::from_static(b"v")).await;
    assert_eq!(cache.len().await, 1);
  }

  #[tokio::test]
  async fn full_cache_drops_oldest_entry() {
    let cache = PageCache::with_capacity(Duration::from_secs(60), 2);
    cache.insert("a".into(), Bytes::from_static(b"1")).await;
    tokio::time::sleep(Duration::from_millis(2)).await;
    cache.insert("b".into(), Bytes::from_static(b"2")).await;
    tokio::time::sleep(Duration::from_millis(2)).await;
    cache.insert("c".into(), Bytes::from_static(b"3")).await;

    assert_eq!(cache.len().await, 2);
    assert!(cache.get("a").await.is_none());
    assert!(cache.get("b").await.is_some());
    assert!(cache.get("c").await.is_some());

    cache.insert("c".into(), Bytes::from_static(b"4")).await;
    assert_eq!(cache.len().await, 2);
    assert_eq!(cache.get("c").await.unwrap(), "4");
  }

  #[tokio::test]
  async fn zero_ttl_disables_caching() {
    let cache = PageCache::new(Duration::ZERO);
    cache.insert("k".into(), Bytes::from_static(b"v")).await;
    assert!(cache.get("k").await.is_none());
  }
}
