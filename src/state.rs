// SPDX-License-Identifier: AGPL-3.0-or-later

//! Shared application state.
//!
//! Everything the handlers need is constructed once in `main` and injected
//! here. The document store sits behind an `RwLock`: read handlers take the
//! read half, and any read-modify-write sequence that consumes a one-time
//! token holds the write half for the whole sequence so two concurrent
//! confirmations cannot both succeed.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::TokenService;
use crate::config::AppConfig;
use crate::email::Mailer;
use crate::storage::DocumentStore;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<RwLock<DocumentStore>>,
    pub tokens: Arc<TokenService>,
    pub mailer: Arc<Mailer>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(storage: DocumentStore, config: AppConfig) -> Self {
        Self {
            storage: Arc::new(RwLock::new(storage)),
            tokens: Arc::new(TokenService::new(&config.jwt_secret)),
            mailer: Arc::new(Mailer::from_config(&config)),
            config: Arc::new(config),
        }
    }
}
