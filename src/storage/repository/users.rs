// SPDX-License-Identifier: AGPL-3.0-or-later

//! Credential store.
//!
//! One JSON document per registered identity under `users/`. The password
//! hash and pending one-time tokens live only in this record; API responses
//! are built from the sanitized projection in `crate::models`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Role;

use super::super::{DocumentStore, StorageError, StoragePaths, StorageResult};

/// Persisted credential record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserRecord {
    /// Identity key (UUID)
    pub id: String,
    /// Unique, trimmed, lowercased
    pub email: String,
    /// bcrypt hash; never leaves the store layer
    pub password_hash: String,
    /// Display name
    pub name: String,
    pub role: Role,
    /// Gate for all protected routes
    pub is_verified: bool,
    /// Pending email-verification token; cleared once consumed
    pub verification_token: Option<String>,
    pub verification_expires: Option<DateTime<Utc>>,
    /// Pending password-reset token; cleared once consumed
    pub reset_token: Option<String>,
    pub reset_expires: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    /// Fresh unverified record with the default (buyer) role.
    pub fn new(email: impl Into<String>, name: impl Into<String>, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.into(),
            password_hash,
            name: name.into(),
            role: Role::default(),
            is_verified: false,
            verification_token: None,
            verification_expires: None,
            reset_token: None,
            reset_expires: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the stored pending verification token matches and is current.
    pub fn verification_token_matches(&self, token: &str, now: DateTime<Utc>) -> bool {
        self.verification_token.as_deref() == Some(token)
            && self.verification_expires.is_some_and(|exp| exp > now)
    }

    /// Whether the stored pending reset token matches and is current.
    pub fn reset_token_matches(&self, token: &str, now: DateTime<Utc>) -> bool {
        self.reset_token.as_deref() == Some(token)
            && self.reset_expires.is_some_and(|exp| exp > now)
    }
}

/// Repository for credential records.
pub struct UserRepository<'a> {
    store: &'a DocumentStore,
}

impl<'a> UserRepository<'a> {
    pub fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Unsafe ids (path separators, dots) are treated as absent, never
    /// resolved against the filesystem.
    pub fn exists(&self, user_id: &str) -> bool {
        StoragePaths::is_safe_id(user_id) && self.store.exists(self.store.paths().user(user_id))
    }

    /// Load a record by identity key.
    pub fn get(&self, user_id: &str) -> StorageResult<UserRecord> {
        if !self.exists(user_id) {
            return Err(StorageError::NotFound(format!("User {user_id}")));
        }
        self.store.read_json(self.store.paths().user(user_id))
    }

    /// Look up a record by its (normalized) email address.
    pub fn find_by_email(&self, email: &str) -> StorageResult<Option<UserRecord>> {
        for id in self
            .store
            .list_files(self.store.paths().users_dir(), "json")?
        {
            if let Ok(record) = self.get(&id) {
                if record.email == email {
                    return Ok(Some(record));
                }
            }
        }
        Ok(None)
    }

    /// Persist a new record. Email uniqueness is enforced here as well as at
    /// the handler layer.
    pub fn create(&self, record: &UserRecord) -> StorageResult<()> {
        if self.exists(&record.id) {
            return Err(StorageError::AlreadyExists(format!("User {}", record.id)));
        }
        if self.find_by_email(&record.email)?.is_some() {
            return Err(StorageError::AlreadyExists(format!(
                "User with email {}",
                record.email
            )));
        }
        self.store
            .write_json(self.store.paths().user(&record.id), record)
    }

    /// Replace an existing record.
    pub fn update(&self, record: &UserRecord) -> StorageResult<()> {
        if !self.exists(&record.id) {
            return Err(StorageError::NotFound(format!("User {}", record.id)));
        }
        self.store
            .write_json(self.store.paths().user(&record.id), record)
    }

    /// All records (admin view).
    pub fn list_all(&self) -> StorageResult<Vec<UserRecord>> {
        let ids = self
            .store
            .list_files(self.store.paths().users_dir(), "json")?;

        let mut users = Vec::new();
        for id in ids {
            if let Ok(record) = self.get(&id) {
                users.push(record);
            }
        }
        Ok(users)
    }

    pub fn count(&self) -> StorageResult<usize> {
        Ok(self
            .store
            .list_files(self.store.paths().users_dir(), "json")?
            .len())
    }
}
