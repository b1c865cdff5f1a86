// SPDX-License-Identifier: AGPL-3.0-or-later

//! Document store directory layout.
//!
//! ```text
//! {data_dir}/
//!   users/{user_id}.json
//!   properties/{property_id}.json
//! ```

use std::path::{Path, PathBuf};

/// Resolves document paths under the store root.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl StoragePaths {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Whether an id may be turned into a document path. Ids arrive from
    /// URLs; anything that could name a path segment (`/`, `\`, `.`) or
    /// exceed a UUID-sized budget never reaches the filesystem.
    pub fn is_safe_id(id: &str) -> bool {
        !id.is_empty()
            && id.len() <= 64
            && id
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn users_dir(&self) -> PathBuf {
        self.root.join("users")
    }

    pub fn user(&self, user_id: &str) -> PathBuf {
        self.users_dir().join(format!("{user_id}.json"))
    }

    pub fn properties_dir(&self) -> PathBuf {
        self.root.join("properties")
    }

    pub fn property(&self, property_id: &str) -> PathBuf {
        self.properties_dir().join(format!("{property_id}.json"))
    }
}
