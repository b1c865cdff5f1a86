// SPDX-License-Identifier: AGPL-3.0-or-later

//! Shared test fixtures.
//!
//! Builds an [`AppState`] over a temp directory with a development config
//! and no email credentials, so tests never touch the network. The returned
//! `TempDir` must be kept alive for the duration of the test.

use tempfile::TempDir;

use crate::auth::{Role, TokenPurpose};
use crate::config::{AppConfig, Environment};
use crate::state::AppState;
use crate::storage::{DocumentStore, StoragePaths, UserRecord, UserRepository};

/// Plaintext password used by every seeded user.
pub const TEST_PASSWORD: &str = "Passw0rd";

pub fn test_config(data_dir: &std::path::Path) -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        data_dir: data_dir.to_path_buf(),
        jwt_secret: "test-secret-key-12345".to_string(),
        client_url: "http://localhost:3000".to_string(),
        environment: Environment::Development,
        email_api_key: None,
        email_sender: "no-reply@realty.local".to_string(),
    }
}

pub fn test_state() -> (AppState, TempDir) {
    test_state_in(Environment::Development)
}

/// Same as [`test_state`] but with an explicit deployment environment, for
/// exercising the production diagnostic switches.
pub fn test_state_in(environment: Environment) -> (AppState, TempDir) {
    let dir = TempDir::new().expect("temp dir");
    let mut store = DocumentStore::new(StoragePaths::new(dir.path()));
    store.initialize().expect("initialize storage");

    let mut config = test_config(dir.path());
    config.environment = environment;
    let state = AppState::new(store, config);
    (state, dir)
}

/// Insert a user directly into storage, bypassing the registration flow.
/// The password is always [`TEST_PASSWORD`].
pub async fn seed_user(
    state: &AppState,
    email: &str,
    name: &str,
    role: Role,
    verified: bool,
) -> UserRecord {
    // Minimum bcrypt cost keeps the test suite fast.
    let hash = bcrypt::hash(TEST_PASSWORD, 4).expect("hash test password");
    let mut record = UserRecord::new(email, name, hash);
    record.role = role;
    record.is_verified = verified;

    let store = state.storage.write().await;
    UserRepository::new(&store)
        .create(&record)
        .expect("seed user");
    record
}

/// Mint a session token for a seeded user.
pub fn session_token_for(state: &AppState, user: &UserRecord) -> String {
    state
        .tokens
        .issue(&user.id, &user.email, user.role, TokenPurpose::Session)
        .expect("issue session token")
}
