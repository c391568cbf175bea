//! Users: authors, commenters and followers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validate::{ValidationErrors, max_chars, required_text};

pub type UserId = i64;

pub const USERNAME_MAX_CHARS: usize = 150;
pub const PASSWORD_MIN_CHARS: usize = 8;

pub const USERNAME_TAKEN: &str = "A user with that username already exists.";

/// Top-level path words that would shadow a profile URL.
pub const RESERVED_USERNAMES: &[&str] = &["auth", "follow", "group", "new"];

/// A registered account. The password hash never leaves the store except
/// through [`crate::store::BlogStore::get_credentials`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub user_id:    UserId,
  pub username:   String,
  pub created_at: DateTime<Utc>,
}

/// Sign-up input as submitted by a client.
#[derive(Debug, Clone, Deserialize)]
pub struct SignupForm {
  #[serde(default)]
  pub username: String,
  #[serde(default)]
  pub password: String,
}

/// A sign-up that passed validation; the password is still plaintext and
/// must be hashed by the caller before it reaches the store.
#[derive(Debug, Clone)]
pub struct ValidSignup {
  pub username: String,
  pub password: String,
}

impl SignupForm {
  pub fn validate(self) -> Result<ValidSignup, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let username = required_text(&mut errors, "username", &self.username);
    if !username.is_empty() {
      check_username(&mut errors, &username);
    }
    if self.password.chars().count() < PASSWORD_MIN_CHARS {
      errors.add(
        "password",
        format!(
          "This password is too short. It must contain at least \
           {PASSWORD_MIN_CHARS} characters."
        ),
      );
    }
    errors.into_result(ValidSignup { username, password: self.password })
  }
}

/// Letters, digits and `@ . + - _` only.
pub fn is_valid_username(username: &str) -> bool {
  !username.is_empty()
    && username
      .chars()
      .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}

fn check_username(errors: &mut ValidationErrors, username: &str) {
  max_chars(errors, "username", username, USERNAME_MAX_CHARS);
  if !is_valid_username(username) {
    errors.add(
      "username",
      "Enter a valid username. This value may contain only letters, numbers, \
       and @/./+/-/_ characters.",
    );
  }
  if RESERVED_USERNAMES.contains(&username) {
    errors.add("username", "This username is reserved.");
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn form(username: &str, password: &str) -> SignupForm {
    SignupForm { username: username.into(), password: password.into() }
  }

  #[test]
  fn accepts_ordinary_signup() {
    let valid = form(" alice ", "correct horse").validate().unwrap();
    assert_eq!(valid.username, "alice");
  }

  #[test]
  fn rejects_bad_username_characters() {
    let errors = form("alice smith", "correct horse").validate().unwrap_err();
    assert!(errors.field("username").is_some());
    assert!(errors.field("password").is_none());
  }

  #[test]
  fn rejects_reserved_usernames() {
    for name in RESERVED_USERNAMES {
      let errors = form(name, "correct horse").validate().unwrap_err();
      assert!(errors.field("username").is_some(), "{name} accepted");
    }
  }

  #[test]
  fn rejects_short_password_and_blank_username() {
    let errors = form("  ", "short").validate().unwrap_err();
    assert!(errors.field("username").is_some());
    assert!(errors.field("password").is_some());
  }

  #[test]
  fn username_charset() {
    assert!(is_valid_username("a.b+c-d_e@f"));
    assert!(!is_valid_username("a/b"));
    assert!(!is_valid_username(""));
  }
}
