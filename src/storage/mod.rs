// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Document Storage
//!
//! Persistent storage as JSON documents on the local filesystem.
//!
//! ## Layout
//!
//! ```text
//! {data_dir}/
//!   users/{user_id}.json          # credential records
//!   properties/{property_id}.json # property listings
//! ```
//!
//! Handlers never touch files directly; they go through the typed
//! repositories in [`repository`]. Cross-document atomicity (one-time token
//! consumption) is provided by the `RwLock` wrapping the store in
//! [`crate::state::AppState`].

pub mod documents;
pub mod paths;
pub mod repository;

pub use documents::{DocumentStore, StorageError, StorageResult};
pub use paths::StoragePaths;
pub use repository::{
    PropertyFilter, PropertyRecord, PropertyRepository, UserRecord, UserRepository,
};
