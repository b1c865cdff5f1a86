// SPDX-License-Identifier: AGPL-3.0-or-later

//! Admin endpoints. Every route requires the admin role via [`AdminOnly`].

use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::WithRejection;
use chrono::Utc;
use tracing::info;

use crate::auth::{AdminOnly, Role};
use crate::error::ApiError;
use crate::models::{
    AdminUserListResponse, DashboardResponse, DashboardStats, MessageResponse, RoleUpdateResponse,
    UpdateRoleRequest, UserResponse,
};
use crate::state::AppState;
use crate::storage::{PropertyRepository, UserRepository};

const RECENT_SIGNUP_LIMIT: usize = 5;

/// Aggregate counts plus the most recent registrations.
#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    responses(
        (status = 200, description = "Dashboard stats", body = DashboardResponse),
        (status = 403, description = "Not an admin")
    ),
    security(("bearer" = [])),
    tag = "Admin"
)]
pub async fn dashboard(
    AdminOnly(_admin): AdminOnly,
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let store = state.storage.read().await;
    let mut users = UserRepository::new(&store).list_all()?;
    let total_properties = PropertyRepository::new(&store).count()?;
    drop(store);

    let total_users = users.len();
    users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let recent_signups = users
        .iter()
        .take(RECENT_SIGNUP_LIMIT)
        .map(UserResponse::from)
        .collect();

    Ok(Json(DashboardResponse {
        success: true,
        stats: DashboardStats {
            total_users,
            total_properties,
            recent_signups,
        },
    }))
}

/// All registered users, sanitized.
#[utoipa::path(
    get,
    path = "/api/admin/users",
    responses(
        (status = 200, description = "User list", body = AdminUserListResponse),
        (status = 403, description = "Not an admin")
    ),
    security(("bearer" = [])),
    tag = "Admin"
)]
pub async fn list_users(
    AdminOnly(_admin): AdminOnly,
    State(state): State<AppState>,
) -> Result<Json<AdminUserListResponse>, ApiError> {
    let store = state.storage.read().await;
    let records = UserRepository::new(&store).list_all()?;

    let users: Vec<UserResponse> = records.iter().map(UserResponse::from).collect();
    Ok(Json(AdminUserListResponse {
        success: true,
        count: users.len(),
        users,
    }))
}

/// Change a user's role.
#[utoipa::path(
    patch,
    path = "/api/admin/users/{id}",
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = RoleUpdateResponse),
        (status = 400, description = "Unknown role name"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "Unknown user")
    ),
    security(("bearer" = [])),
    tag = "Admin"
)]
pub async fn update_user_role(
    AdminOnly(admin): AdminOnly,
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Json(body), _): WithRejection<Json<UpdateRoleRequest>, ApiError>,
) -> Result<Json<RoleUpdateResponse>, ApiError> {
    let Some(role) = Role::parse(&body.role) else {
        return Err(ApiError::bad_request("Invalid role specified"));
    };

    let store = state.storage.write().await;
    let repo = UserRepository::new(&store);
    let mut record = repo.get(&id)?;
    record.role = role;
    record.updated_at = Utc::now();
    repo.update(&record)?;
    drop(store);

    info!(user_id = %id, new_role = %role, changed_by = %admin.id, "role updated");

    Ok(Json(RoleUpdateResponse {
        success: true,
        message: format!("Role updated to {role}"),
        user: UserResponse::from(&record),
    }))
}

/// Remove any listing, regardless of owner.
#[utoipa::path(
    delete,
    path = "/api/admin/properties/{id}",
    params(("id" = String, Path, description = "Property id")),
    responses(
        (status = 200, description = "Listing deleted", body = MessageResponse),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "Unknown listing")
    ),
    security(("bearer" = [])),
    tag = "Admin"
)]
pub async fn delete_any_property(
    AdminOnly(admin): AdminOnly,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    {
        let store = state.storage.write().await;
        PropertyRepository::new(&store).delete(&id)?;
    }

    info!(property_id = %id, deleted_by = %admin.id, "listing deleted by admin");

    Ok(Json(MessageResponse::ok("Property deleted successfully")))
}
