// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Authentication & Authorization
//!
//! The credential chain: bcrypt password hashing, purpose-scoped JWTs, and
//! axum extractors that gate protected routes.
//!
//! ## Request flow
//!
//! 1. [`extractor::Auth`] pulls the session token (cookie, then bearer
//!    header, then a JSON `token` body field), verifies it, and re-resolves
//!    the account from storage.
//! 2. Unverified accounts are rejected before any role check.
//! 3. [`extractor::AgentOrAdmin`] / [`extractor::AdminOnly`] apply the
//!    route's role allow-list on top.
//!
//! Failures surface as [`AuthError`], which renders the standard
//! `{"success": false, "error": ...}` envelope.

pub mod error;
pub mod extractor;
pub mod password;
pub mod roles;
pub mod tokens;

pub use error::AuthError;
pub use extractor::{body_token_fallback, AdminOnly, AgentOrAdmin, Auth, BodyToken, CurrentUser};
pub use password::{hash_password, verify_password};
pub use roles::Role;
pub use tokens::{Claims, TokenPurpose, TokenService};
