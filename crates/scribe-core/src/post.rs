//! Posts and the post form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  group::GroupId,
  user::UserId,
  validate::{INVALID_CHOICE, ValidationErrors, required_text},
};

pub type PostId = i64;

/// File extensions accepted for a post's image reference.
pub const IMAGE_EXTENSIONS: &[&str] = &["bmp", "gif", "jpeg", "jpg", "png", "webp"];

/// A published post, joined with the author's username and the group slug so
/// feeds can be rendered without further lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
  pub post_id:    PostId,
  pub text:       String,
  /// Server-assigned; never changes after creation.
  pub created_at: DateTime<Utc>,
  pub author_id:  UserId,
  pub author:     String,
  pub group_id:   Option<GroupId>,
  pub group_slug: Option<String>,
  /// Reference to an uploaded image (a relative path), if any.
  pub image:      Option<String>,
}

/// Input to [`crate::store::BlogStore::create_post`].
/// `created_at` is always set by the store.
#[derive(Debug, Clone)]
pub struct NewPost {
  pub author_id: UserId,
  pub text:      String,
  pub group_id:  Option<GroupId>,
  pub image:     Option<String>,
}

/// Input to [`crate::store::BlogStore::update_post`]. Every editable field is
/// replaced; author and timestamp are untouched.
#[derive(Debug, Clone)]
pub struct PostChanges {
  pub text:     String,
  pub group_id: Option<GroupId>,
  pub image:    Option<String>,
}

/// The create/edit form as submitted by a client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostForm {
  #[serde(default)]
  pub text:  String,
  pub group: Option<GroupId>,
  pub image: Option<String>,
}

impl PostForm {
  /// Field checks. Whether `group` names an existing group is only known to
  /// the store, so the caller passes that answer in.
  pub fn validate(self, group_exists: bool) -> Result<PostChanges, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let text = required_text(&mut errors, "text", &self.text);

    if self.group.is_some() && !group_exists {
      errors.add("group", INVALID_CHOICE);
    }

    let image = self
      .image
      .map(|i| i.trim().to_owned())
      .filter(|i| !i.is_empty());
    if let Some(image) = &image
      && !is_image_reference(image)
    {
      errors.add(
        "image",
        "Upload a valid image. The file you uploaded was either not an image \
         or a corrupted image.",
      );
    }

    errors.into_result(PostChanges { text, group_id: self.group, image })
  }
}

/// `true` when `reference` names a file with a known image extension.
pub fn is_image_reference(reference: &str) -> bool {
  let file_name = reference.rsplit('/').next().unwrap_or(reference);
  match file_name.rsplit_once('.') {
    Some((stem, ext)) if !stem.is_empty() => IMAGE_EXTENSIONS
      .iter()
      .any(|allowed| allowed.eq_ignore_ascii_case(ext)),
    _ => false,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::validate::REQUIRED;

  #[test]
  fn image_references() {
    assert!(is_image_reference("posts/small.gif"));
    assert!(is_image_reference("PHOTO.JPG"));
    assert!(!is_image_reference("posts/notes.txt"));
    assert!(!is_image_reference("posts/.png"));
    assert!(!is_image_reference("posts/noext"));
  }

  #[test]
  fn valid_form_becomes_changes() {
    let changes = PostForm {
      text:  "  hello  ".into(),
      group: Some(3),
      image: Some("posts/a.png".into()),
    }
    .validate(true)
    .unwrap();
    assert_eq!(changes.text, "hello");
    assert_eq!(changes.group_id, Some(3));
    assert_eq!(changes.image.as_deref(), Some("posts/a.png"));
  }

  #[test]
  fn empty_text_unknown_group_and_bad_image_are_reported() {
    let errors = PostForm {
      text:  " ".into(),
      group: Some(99),
      image: Some("posts/a.exe".into()),
    }
    .validate(false)
    .unwrap_err();
    assert_eq!(errors.field("text").unwrap(), &[REQUIRED]);
    assert_eq!(errors.field("group").unwrap(), &[INVALID_CHOICE]);
    assert!(errors.field("image").is_some());
  }

  #[test]
  fn blank_image_means_no_image() {
    let changes = PostForm {
      text:  "x".into(),
      group: None,
      image: Some("   ".into()),
    }
    .validate(false)
    .unwrap();
    assert!(changes.image.is_none());
  }
}
