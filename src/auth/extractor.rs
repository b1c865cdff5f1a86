// SPDX-License-Identifier: AGPL-3.0-or-later

//! Axum extractors for authenticated users.
//!
//! Use the `Auth` extractor in handlers to require a logged-in, verified
//! account:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is CurrentUser
//! }
//! ```
//!
//! `AgentOrAdmin` and `AdminOnly` layer role checks on top. Each request
//! resolves the account from storage, so deleted accounts and role changes
//! take effect immediately even while an old session token is still
//! unexpired.
//!
//! Tokens travel in the `token` cookie, the `Authorization: Bearer` header,
//! or (for JSON bodies, loosest precedence) a top-level `token` body field
//! surfaced by the [`body_token_fallback`] middleware.

use axum::{
    body::{to_bytes, Body},
    extract::{FromRequestParts, Request},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        request::Parts,
    },
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

use super::{AuthError, Role, TokenPurpose};
use crate::state::AppState;
use crate::storage::{StorageError, UserRepository};

/// Authenticated account as seen by handlers. Sanitized: no password hash,
/// no pending tokens.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub is_verified: bool,
}

/// Matches axum's default request body limit.
const BODY_TOKEN_LIMIT: usize = 2 * 1024 * 1024;

/// Session token found in a JSON request body. Lowest-precedence transport,
/// populated by [`body_token_fallback`] because extractors only see request
/// parts.
#[derive(Debug, Clone)]
pub struct BodyToken(pub String);

/// Lifts a top-level `token` field out of a JSON body into request
/// extensions when neither the `token` cookie nor the Authorization header
/// is present. The body is buffered and handed on unchanged.
pub async fn body_token_fallback(request: Request, next: Next) -> Response {
    let headers = request.headers();
    let has_cookie = CookieJar::from_headers(headers).get("token").is_some();
    let is_json = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    if has_cookie || headers.contains_key(AUTHORIZATION) || !is_json {
        return next.run(request).await;
    }

    let (mut parts, body) = request.into_parts();
    let bytes = match to_bytes(body, BODY_TOKEN_LIMIT).await {
        Ok(bytes) => bytes,
        // Oversized or failed body: let the route's own body handling reject it.
        Err(_) => return next.run(Request::from_parts(parts, Body::empty())).await,
    };
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(&bytes) {
        if let Some(token) = value.get("token").and_then(|t| t.as_str()) {
            parts.extensions.insert(BodyToken(token.to_string()));
        }
    }
    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

/// Pull the session token from the request: `token` cookie first, then the
/// `Authorization: Bearer` header, then a `token` body field (via
/// [`BodyToken`]). First match wins.
fn extract_token(parts: &Parts) -> Result<String, AuthError> {
    let jar = CookieJar::from_headers(&parts.headers);
    if let Some(cookie) = jar.get("token") {
        return Ok(cookie.value().to_string());
    }

    if let Some(header) = parts.headers.get(AUTHORIZATION) {
        let header = header.to_str().map_err(|_| AuthError::InvalidAuthHeader)?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidAuthHeader)?;
        if token.is_empty() {
            return Err(AuthError::InvalidAuthHeader);
        }
        return Ok(token.to_string());
    }

    if let Some(BodyToken(token)) = parts.extensions.get::<BodyToken>() {
        return Ok(token.clone());
    }

    Err(AuthError::MissingToken)
}

/// Extractor that requires a valid session and a verified account.
pub struct Auth(pub CurrentUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // An upstream extractor on the same request may already have
        // resolved the user.
        if let Some(user) = parts.extensions.get::<CurrentUser>().cloned() {
            return Ok(Auth(user));
        }

        let token = extract_token(parts)?;
        let claims = state.tokens.verify(&token, TokenPurpose::Session)?;

        // Re-resolve the account; the token's claims may be stale.
        let store = state.storage.read().await;
        let record = UserRepository::new(&store)
            .get(&claims.sub)
            .map_err(|e| match e {
                StorageError::NotFound(_) => AuthError::UserNotFound,
                other => AuthError::Internal(format!("user lookup: {other}")),
            })?;
        drop(store);

        if !record.is_verified {
            return Err(AuthError::NotVerified);
        }

        let user = CurrentUser {
            id: record.id,
            email: record.email,
            name: record.name,
            role: record.role,
            is_verified: record.is_verified,
        };
        parts.extensions.insert(user.clone());

        Ok(Auth(user))
    }
}

/// Require a role from the allow-list, on top of `Auth`.
///
/// The rejection echoes the required roles only in development
/// configurations; production responses stay opaque.
fn require_roles(
    user: CurrentUser,
    allowed: &[Role],
    state: &AppState,
) -> Result<CurrentUser, AuthError> {
    if user.role.allowed_by(allowed) {
        return Ok(user);
    }

    let required = state.config.is_development().then(|| {
        allowed
            .iter()
            .map(Role::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    });
    Err(AuthError::InsufficientPermissions { required })
}

/// Extractor for routes open to listing agents and admins.
#[derive(Debug)]
pub struct AgentOrAdmin(pub CurrentUser);

impl FromRequestParts<AppState> for AgentOrAdmin {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Auth(user) = Auth::from_request_parts(parts, state).await?;
        let user = require_roles(user, &[Role::Agent, Role::Admin], state)?;
        Ok(AgentOrAdmin(user))
    }
}

/// Extractor for admin-only routes.
#[derive(Debug)]
pub struct AdminOnly(pub CurrentUser);

impl FromRequestParts<AppState> for AdminOnly {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Auth(user) = Auth::from_request_parts(parts, state).await?;
        let user = require_roles(user, &[Role::Admin], state)?;
        Ok(AdminOnly(user))
    }
}
