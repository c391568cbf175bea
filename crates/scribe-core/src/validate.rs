//! Typed field-level validation errors.
//!
//! Every piece of user input (post and comment forms, sign-up data, group
//! definitions) is checked by a `validate` function before it reaches the
//! store. Failures are collected per field so a client can redisplay the
//! form with all problems at once.

use std::{collections::BTreeMap, fmt};

use serde::Serialize;

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_CHOICE: &str = "Select a valid choice.";

/// Field name → list of human-readable messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
  pub fn new() -> Self { Self::default() }

  pub fn add(&mut self, field: &str, message: impl Into<String>) {
    self.0.entry(field.to_owned()).or_default().push(message.into());
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  /// Messages recorded for `field`, if any.
  pub fn field(&self, field: &str) -> Option<&[String]> {
    self.0.get(field).map(Vec::as_slice)
  }

  /// `Ok(value)` when nothing was recorded, otherwise `Err(self)`.
  pub fn into_result<T>(self, value: T) -> Result<T, Self> {
    if self.is_empty() { Ok(value) } else { Err(self) }
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut first = true;
    for (field, messages) in &self.0 {
      for message in messages {
        if !first {
          f.write_str("; ")?;
        }
        write!(f, "{field}: {message}")?;
        first = false;
      }
    }
    Ok(())
  }
}

impl std::error::Error for ValidationErrors {}

/// Trim `value` and record [`REQUIRED`] if nothing is left.
pub(crate) fn required_text(
  errors: &mut ValidationErrors,
  field: &str,
  value: &str,
) -> String {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    errors.add(field, REQUIRED);
  }
  trimmed.to_owned()
}

/// Record an error if `value` is longer than `max` characters.
pub(crate) fn max_chars(
  errors: &mut ValidationErrors,
  field: &str,
  value: &str,
  max: usize,
) {
  let len = value.chars().count();
  if len > max {
    errors.add(
      field,
      format!("Ensure this value has at most {max} characters (it has {len})."),
    );
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn collects_messages_per_field() {
    let mut errors = ValidationErrors::new();
    errors.add("text", REQUIRED);
    errors.add("group", INVALID_CHOICE);
    errors.add("text", "too short");

    assert_eq!(errors.field("text").unwrap().len(), 2);
    assert_eq!(errors.field("group").unwrap(), &[INVALID_CHOICE]);
    assert!(errors.field("image").is_none());
  }

  #[test]
  fn serialises_as_plain_map() {
    let mut errors = ValidationErrors::new();
    errors.add("text", REQUIRED);
    let json = serde_json::to_value(&errors).unwrap();
    assert_eq!(json, serde_json::json!({ "text": [REQUIRED] }));
  }

  #[test]
  fn required_text_trims_and_flags_blank() {
    let mut errors = ValidationErrors::new();
    assert_eq!(required_text(&mut errors, "text", "  hi \n"), "hi");
    assert!(errors.is_empty());

    required_text(&mut errors, "text", "   ");
    assert_eq!(errors.field("text").unwrap(), &[REQUIRED]);
  }

  #[test]
  fn into_result_passes_value_through_when_clean() {
    assert_eq!(ValidationErrors::new().into_result(7), Ok(7));
    let mut errors = ValidationErrors::new();
    errors.add("x", "bad");
    assert!(errors.into_result(7).is_err());
  }
}
