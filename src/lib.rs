// SPDX-License-Identifier: AGPL-3.0-or-later

//! Realty Server - Real-Estate Listing Backend
//!
//! REST backend for a property listing application: account registration
//! with email verification, JWT sessions, role-based authorization
//! (buyer/agent/admin), and CRUD over property listings persisted as JSON
//! documents.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Passwords, tokens, and the authentication/authorization gates
//! - `storage` - JSON document store and typed repositories
//! - `email` - Transactional email (verification and reset links)

pub mod api;
pub mod auth;
pub mod config;
pub mod email;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;

#[cfg(test)]
pub mod testing;
