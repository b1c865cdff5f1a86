// SPDX-License-Identifier: AGPL-3.0-or-later

//! Property listing store.
//!
//! One JSON document per listing under `properties/`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::super::{DocumentStore, StorageError, StoragePaths, StorageResult};

/// Persisted property listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyRecord {
    pub id: String,
    pub title: String,
    pub price: u64,
    pub location: String,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub description: Option<String>,
    pub images: Vec<String>,
    /// Identity key of the listing agent
    pub posted_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PropertyRecord {
    pub fn new(
        title: impl Into<String>,
        price: u64,
        location: impl Into<String>,
        posted_by: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            price,
            location: location.into(),
            bedrooms: None,
            bathrooms: None,
            description: None,
            images: Vec::new(),
            posted_by: posted_by.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Listing filters applied server-side.
#[derive(Debug, Default, Clone)]
pub struct PropertyFilter {
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    /// Minimum bedroom count
    pub bedrooms: Option<u32>,
    /// Exact match
    pub location: Option<String>,
}

impl PropertyFilter {
    fn matches(&self, record: &PropertyRecord) -> bool {
        if self.min_price.is_some_and(|min| record.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| record.price > max) {
            return false;
        }
        if self
            .bedrooms
            .is_some_and(|min| record.bedrooms.unwrap_or(0) < min)
        {
            return false;
        }
        if let Some(ref location) = self.location {
            if &record.location != location {
                return false;
            }
        }
        true
    }
}

/// Repository for property listings.
pub struct PropertyRepository<'a> {
    store: &'a DocumentStore,
}

impl<'a> PropertyRepository<'a> {
    pub fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Unsafe ids (path separators, dots) are treated as absent, never
    /// resolved against the filesystem.
    pub fn exists(&self, property_id: &str) -> bool {
        StoragePaths::is_safe_id(property_id)
            && self.store.exists(self.store.paths().property(property_id))
    }

    pub fn get(&self, property_id: &str) -> StorageResult<PropertyRecord> {
        if !self.exists(property_id) {
            return Err(StorageError::NotFound(format!("Property {property_id}")));
        }
        self.store.read_json(self.store.paths().property(property_id))
    }

    pub fn create(&self, record: &PropertyRecord) -> StorageResult<()> {
        if self.exists(&record.id) {
            return Err(StorageError::AlreadyExists(format!(
                "Property {}",
                record.id
            )));
        }
        self.store
            .write_json(self.store.paths().property(&record.id), record)
    }

    pub fn update(&self, record: &PropertyRecord) -> StorageResult<()> {
        if !self.exists(&record.id) {
            return Err(StorageError::NotFound(format!("Property {}", record.id)));
        }
        self.store
            .write_json(self.store.paths().property(&record.id), record)
    }

    pub fn delete(&self, property_id: &str) -> StorageResult<()> {
        if !self.exists(property_id) {
            return Err(StorageError::NotFound(format!("Property {property_id}")));
        }
        self.store.delete(self.store.paths().property(property_id))
    }

    /// Filtered listing, newest first.
    pub fn list_filtered(&self, filter: &PropertyFilter) -> StorageResult<Vec<PropertyRecord>> {
        let ids = self
            .store
            .list_files(self.store.paths().properties_dir(), "json")?;

        let mut records = Vec::new();
        for id in ids {
            if let Ok(record) = self.get(&id) {
                if filter.matches(&record) {
                    records.push(record);
                }
            }
        }
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    pub fn count(&self) -> StorageResult<usize> {
        Ok(self
            .store
            .list_files(self.store.paths().properties_dir(), "json")?
            .len())
    }
}
