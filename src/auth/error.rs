// SPDX-License-Identifier: AGPL-3.0-or-later

//! Authentication and authorization errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Error produced by the authentication and authorization gates.
///
/// Each variant maps to a terminal request outcome; there is no retry within
/// a single request.
#[derive(Debug)]
pub enum AuthError {
    /// No token in the cookie or Authorization header
    MissingToken,
    /// Authorization header present but not `Bearer <token>`
    InvalidAuthHeader,
    /// Token signature valid but past its expiry
    TokenExpired,
    /// Token malformed, tampered with, or signed for another purpose
    InvalidToken,
    /// Token verified but the account no longer exists
    UserNotFound,
    /// Account exists but the email address was never confirmed
    NotVerified,
    /// Authenticated role is not in the route's allow-list. The required
    /// roles are echoed back only in development configurations.
    InsufficientPermissions { required: Option<String> },
    /// Store or other unexpected failure; detail stays server-side
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    success: bool,
    error: String,
}

impl AuthError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingToken
            | AuthError::InvalidAuthHeader
            | AuthError::TokenExpired
            | AuthError::InvalidToken
            | AuthError::UserNotFound => StatusCode::UNAUTHORIZED,
            AuthError::NotVerified | AuthError::InsufficientPermissions { .. } => {
                StatusCode::FORBIDDEN
            }
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "Authentication required. No token provided."),
            AuthError::InvalidAuthHeader => {
                write!(f, "Invalid authorization header format (expected 'Bearer <token>')")
            }
            AuthError::TokenExpired => write!(f, "Session expired. Please log in again."),
            AuthError::InvalidToken => write!(f, "Invalid token. Please authenticate."),
            AuthError::UserNotFound => write!(f, "Invalid token - user not found"),
            AuthError::NotVerified => {
                write!(f, "Account not verified. Please check your email.")
            }
            AuthError::InsufficientPermissions { required } => match required {
                Some(roles) => write!(f, "Access forbidden. Required roles: {roles}"),
                None => write!(f, "Insufficient permissions"),
            },
            AuthError::Internal(_) => write!(f, "Authentication failed. Please try again."),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let AuthError::Internal(detail) = &self {
            tracing::error!(error = %detail, "authentication gate failure");
        }
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            success: false,
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn missing_token_returns_401() {
        let response = AuthError::MissingToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Authentication required. No token provided.");
    }

    #[tokio::test]
    async fn unverified_account_returns_403() {
        let response = AuthError::NotVerified.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn permission_message_is_opaque_without_role_detail() {
        let opaque = AuthError::InsufficientPermissions { required: None };
        assert_eq!(opaque.to_string(), "Insufficient permissions");

        let verbose = AuthError::InsufficientPermissions {
            required: Some("agent, admin".to_string()),
        };
        assert_eq!(
            verbose.to_string(),
            "Access forbidden. Required roles: agent, admin"
        );
    }

    #[test]
    fn internal_error_hides_detail() {
        let err = AuthError::Internal("store exploded".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.to_string().contains("store exploded"));
    }
}
