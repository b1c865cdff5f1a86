// SPDX-License-Identifier: AGPL-3.0-or-later

//! API error responses.
//!
//! Every failure surfaces to the client as a JSON object of the shape
//! `{"success": false, "error": "<message>"}` with an appropriate status
//! code. Unexpected errors are logged server-side with detail and mapped to
//! a generic 500 message.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::auth::AuthError;
use crate::storage::StorageError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn unsupported_media_type(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNSUPPORTED_MEDIA_TYPE, message)
    }

    /// Generic 500. The caller is expected to have logged the detail.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            success: false,
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(entity) => ApiError::not_found(format!("{entity} not found")),
            StorageError::AlreadyExists(entity) => {
                ApiError::conflict(format!("{entity} already exists"))
            }
            other => {
                tracing::error!(error = %other, "storage failure");
                ApiError::internal("Internal server error")
            }
        }
    }
}

/// For handlers that call into the auth layer directly (token issuance,
/// hashing). The gate extractors respond with `AuthError` themselves.
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        if let AuthError::Internal(detail) = &err {
            tracing::error!(error = %detail, "auth failure");
        }
        ApiError::new(err.status_code(), err.to_string())
    }
}

/// Keeps the JSON envelope when axum rejects a request body, instead of
/// axum's plain-text rejection.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::unsupported_media_type("Content-Type must be application/json")
            }
            other => ApiError::bad_request(other.body_text()),
        }
    }
}
