//! Groups: named topics a post can optionally be filed under.
//!
//! Groups are managed by operators (see the `scribe create-group` command),
//! never by ordinary users.

use serde::{Deserialize, Serialize};

use crate::validate::{ValidationErrors, max_chars, required_text};

pub type GroupId = i64;

pub const TITLE_MAX_CHARS: usize = 200;
pub const SLUG_MAX_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
  pub group_id:    GroupId,
  pub title:       String,
  /// Unique, URL-safe identifier used in `/group/<slug>/`.
  pub slug:        String,
  pub description: String,
}

/// Input to [`crate::store::BlogStore::create_group`] and
/// [`crate::store::BlogStore::update_group`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewGroup {
  pub title:       String,
  pub slug:        String,
  #[serde(default)]
  pub description: String,
}

impl NewGroup {
  /// Trim fields and check title/slug constraints. Slug uniqueness is left
  /// to the store.
  pub fn validate(self) -> Result<NewGroup, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let title = required_text(&mut errors, "title", &self.title);
    max_chars(&mut errors, "title", &title, TITLE_MAX_CHARS);

    let slug = required_text(&mut errors, "slug", &self.slug);
    max_chars(&mut errors, "slug", &slug, SLUG_MAX_CHARS);
    if !slug.is_empty() && !is_valid_slug(&slug) {
      errors.add(
        "slug",
        "Enter a valid \"slug\" consisting of letters, numbers, underscores \
         or hyphens.",
      );
    }

    errors.into_result(NewGroup {
      title,
      slug,
      description: self.description.trim().to_owned(),
    })
  }
}

/// ASCII letters, digits, `-` and `_`.
pub fn is_valid_slug(slug: &str) -> bool {
  !slug.is_empty()
    && slug
      .chars()
      .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn slug_rules() {
    assert!(is_valid_slug("test-slug_2"));
    assert!(!is_valid_slug("test slug"));
    assert!(!is_valid_slug("тест"));
    assert!(!is_valid_slug(""));
  }

  #[test]
  fn validate_trims_and_checks() {
    let ok = NewGroup {
      title:       " Cats ".into(),
      slug:        "cats".into(),
      description: " all about cats ".into(),
    }
    .validate()
    .unwrap();
    assert_eq!(ok.title, "Cats");
    assert_eq!(ok.description, "all about cats");

    let errors = NewGroup {
      title:       "".into(),
      slug:        "no spaces".into(),
      description: String::new(),
    }
    .validate()
    .unwrap_err();
    assert!(errors.field("title").is_some());
    assert!(errors.field("slug").is_some());
  }

  #[test]
  fn overlong_slug_is_rejected() {
    let errors = NewGroup {
      title:       "t".into(),
      slug:        "a".repeat(SLUG_MAX_CHARS + 1),
      description: String::new(),
    }
    .validate()
    .unwrap_err();
    assert!(errors.field("slug").is_some());
  }
}
