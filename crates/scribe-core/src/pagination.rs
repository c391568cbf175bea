//! Fixed-size page slicing.
//!
//! A [`Paginator`] knows only the total item count and the page size. It
//! resolves a caller-supplied page selector to a valid page number (clamping
//! instead of failing) and tells the store which window to fetch.

use serde::{Deserialize, Serialize};

/// Items per page for every feed and comment thread.
pub const PAGE_SIZE: usize = 10;

/// The raw `?page=` value as sent by a client.
///
/// Missing or non-numeric selectors mean the first page; numbers outside
/// `1..=num_pages` clamp to the nearest end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSelector {
  #[default]
  First,
  Number(i64),
}

impl PageSelector {
  pub fn parse(raw: Option<&str>) -> Self {
    raw
      .and_then(|s| s.trim().parse::<i64>().ok())
      .map_or(Self::First, Self::Number)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
  count:    usize,
  per_page: usize,
}

impl Paginator {
  /// A page size of zero is treated as one.
  pub fn new(count: usize, per_page: usize) -> Self {
    Self { count, per_page: per_page.max(1) }
  }

  pub fn count(&self) -> usize { self.count }

  pub fn per_page(&self) -> usize { self.per_page }

  /// Always at least one: an empty list has a single empty page.
  pub fn num_pages(&self) -> usize { self.count.div_ceil(self.per_page).max(1) }

  /// Clamp `selector` into `1..=num_pages`.
  pub fn resolve(&self, selector: PageSelector) -> usize {
    match selector {
      PageSelector::First => 1,
      PageSelector::Number(n) if n < 1 => 1,
      PageSelector::Number(n) => {
        usize::try_from(n).map_or(self.num_pages(), |n| n.min(self.num_pages()))
      }
    }
  }

  /// `(offset, limit)` of page `number` (1-based, already resolved).
  pub fn window(&self, number: usize) -> (usize, usize) {
    let offset = (number.max(1) - 1) * self.per_page;
    let limit = self.per_page.min(self.count.saturating_sub(offset));
    (offset, limit)
  }

  /// Wrap the items fetched for page `number`.
  pub fn page<T>(&self, number: usize, items: Vec<T>) -> Page<T> {
    Page {
      number,
      num_pages: self.num_pages(),
      count: self.count,
      per_page: self.per_page,
      has_next: number < self.num_pages(),
      has_previous: number > 1,
      items,
    }
  }
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
  /// 1-based.
  pub number:       usize,
  pub num_pages:    usize,
  /// Total items across all pages.
  pub count:        usize,
  pub per_page:     usize,
  pub has_next:     bool,
  pub has_previous: bool,
  pub items:        Vec<T>,
}

impl<T> Page<T> {
  pub fn len(&self) -> usize { self.items.len() }

  pub fn is_empty(&self) -> bool { self.items.is_empty() }
}
