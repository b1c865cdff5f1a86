// SPDX-License-Identifier: AGPL-3.0-or-later

//! Profile endpoints for the authenticated user.

use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;
use chrono::Utc;

use crate::auth::Auth;
use crate::error::ApiError;
use crate::models::{UpdateProfileRequest, UserMeResponse, UserResponse};
use crate::state::AppState;
use crate::storage::UserRepository;

use super::validate::validate_name;

/// Current user's profile.
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Profile", body = UserMeResponse),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer" = [])),
    tag = "Users"
)]
pub async fn get_me(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<UserMeResponse>, ApiError> {
    let store = state.storage.read().await;
    let record = UserRepository::new(&store).get(&user.id)?;

    Ok(Json(UserMeResponse {
        success: true,
        user: UserResponse::from(&record),
    }))
}

/// Partial profile update.
///
/// Only the display name is mutable here. Email changes would bypass
/// verification and password changes bypass the reset flow, so both are
/// rejected outright rather than silently ignored.
#[utoipa::path(
    patch,
    path = "/api/users/me",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserMeResponse),
        (status = 400, description = "Immutable field or invalid name"),
        (status = 401, description = "Not authenticated"),
        (status = 415, description = "Body is not application/json")
    ),
    security(("bearer" = [])),
    tag = "Users"
)]
pub async fn update_me(
    Auth(user): Auth,
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<UpdateProfileRequest>, ApiError>,
) -> Result<Json<UserMeResponse>, ApiError> {
    if body.email.is_some() {
        return Err(ApiError::bad_request(
            "Email cannot be changed through this endpoint",
        ));
    }
    if body.password.is_some() {
        return Err(ApiError::bad_request(
            "Password cannot be changed through this endpoint",
        ));
    }
    let Some(name) = body.name.as_deref() else {
        return Err(ApiError::bad_request("No updatable fields provided"));
    };
    let name = validate_name(name)?.to_string();

    let store = state.storage.write().await;
    let repo = UserRepository::new(&store);
    let mut record = repo.get(&user.id)?;
    record.name = name;
    record.updated_at = Utc::now();
    repo.update(&record)?;

    Ok(Json(UserMeResponse {
        success: true,
        user: UserResponse::from(&record),
    }))
}
