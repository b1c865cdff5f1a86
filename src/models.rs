// SPDX-License-Identifier: AGPL-3.0-or-later

//! # API Data Models
//!
//! Request and response types for the REST API. All types derive `Serialize`
//! or `Deserialize` plus `ToSchema` for OpenAPI documentation. Multiword
//! field names are camelCase on the wire.
//!
//! Every response carries a `success` boolean; failures (built in
//! [`crate::error`] and [`crate::auth::error`]) carry an `error` string.
//! Sanitized user projections never include the password hash or pending
//! tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::Role;
use crate::storage::{PropertyRecord, UserRecord};

// =============================================================================
// User Models
// =============================================================================

/// Sanitized user projection. The only user shape that leaves the API.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&UserRecord> for UserResponse {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id.clone(),
            email: record.email.clone(),
            name: record.name.clone(),
            role: record.role,
            is_verified: record.is_verified,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub user: UserResponse,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    /// Session bearer token (24h)
    pub token: String,
    pub user: UserResponse,
}

/// 403 body for login attempts against unverified accounts. Leaks
/// verification state on purpose so clients can offer a resend action.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnverifiedLoginResponse {
    pub success: bool,
    pub error: String,
    pub resend_endpoint: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ResendVerificationRequest {
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

/// Partial profile update. Email and password are immutable through this
/// endpoint; their presence is a 400.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserMeResponse {
    pub success: bool,
    pub user: UserResponse,
}

/// Generic success acknowledgement.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

// =============================================================================
// Property Models
// =============================================================================

/// Property listing as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropertyResponse {
    pub id: String,
    pub title: String,
    pub price: u64,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub images: Vec<String>,
    pub posted_by: String,
    pub created_at: DateTime<Utc>,
}

impl From<&PropertyRecord> for PropertyResponse {
    fn from(record: &PropertyRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            price: record.price,
            location: record.location.clone(),
            bedrooms: record.bedrooms,
            bathrooms: record.bathrooms,
            description: record.description.clone(),
            images: record.images.clone(),
            posted_by: record.posted_by.clone(),
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreatePropertyRequest {
    pub title: String,
    pub price: u64,
    pub location: String,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdatePropertyRequest {
    pub title: Option<String>,
    pub price: Option<u64>,
    pub location: Option<String>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
}

/// Listing filters passed as query parameters.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PropertyQuery {
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    /// Minimum bedroom count
    pub bedrooms: Option<u32>,
    /// Exact location match
    pub location: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PropertyListResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<PropertyResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PropertyDetailResponse {
    pub success: bool,
    pub data: PropertyResponse,
}

// =============================================================================
// Admin Models
// =============================================================================

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: usize,
    pub total_properties: usize,
    /// Five most recent registrations, newest first
    pub recent_signups: Vec<UserResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub success: bool,
    pub stats: DashboardStats,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminUserListResponse {
    pub success: bool,
    pub count: usize,
    pub users: Vec<UserResponse>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateRoleRequest {
    pub role: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoleUpdateResponse {
    pub success: bool,
    pub message: String,
    pub user: UserResponse,
}
