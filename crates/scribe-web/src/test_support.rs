//! Shared fixtures for the web tests.

use argon2::{
  Algorithm, Argon2, Params, PasswordHasher, Version, password_hash::SaltString,
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use rand_core::OsRng;
use scribe_core::{store::BlogStore, user::User};
use scribe_store_sqlite::SqliteStore;

use crate::{AppState, ServerConfig};

pub fn basic(user: &str, pass: &str) -> String {
  format!("Basic {}", B64.encode(format!("{user}:{pass}")))
}

/// Argon2 with the smallest allowed cost; verification reads the parameters
/// back from the PHC string.
fn cheap_hash(password: &str) -> String {
  let params = Params::new(8, 1, 1, None).unwrap();
  let salt = SaltString::generate(&mut OsRng);
  Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    .hash_password(password.as_bytes(), &salt)
    .unwrap()
    .to_string()
}

pub async fn state() -> AppState<SqliteStore> {
  let store = SqliteStore::open_in_memory().await.unwrap();
  AppState::new(store, ServerConfig::default())
}

pub async fn add_user(state: &AppState<SqliteStore>, name: &str, password: &str) -> User {
  state
    .store
    .create_user(name.to_string(), cheap_hash(password))
    .await
    .unwrap()
}

pub async fn state_with_user(name: &str, password: &str) -> (AppState<SqliteStore>, User) {
  let state = state().await;
  let user = add_user(&state, name, password).await;
  (state, user)
}
