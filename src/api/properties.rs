// SPDX-License-Identifier: AGPL-3.0-or-later

//! Property listing endpoints.
//!
//! Reads are public. Writes require the agent or admin role; agents may only
//! modify listings they posted, admins may modify any.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::WithRejection;
use chrono::Utc;
use tracing::info;

use crate::auth::{AgentOrAdmin, CurrentUser, Role};
use crate::error::ApiError;
use crate::models::{
    CreatePropertyRequest, PropertyDetailResponse, PropertyListResponse, PropertyQuery,
    PropertyResponse, UpdatePropertyRequest,
};
use crate::state::AppState;
use crate::storage::{PropertyFilter, PropertyRecord, PropertyRepository};

const MAX_TITLE_LENGTH: usize = 100;
const MAX_DESCRIPTION_LENGTH: usize = 1000;

fn validate_title(title: &str) -> Result<&str, ApiError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ApiError::bad_request("Title is required"));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(ApiError::bad_request("Title must be 100 characters or fewer"));
    }
    Ok(title)
}

fn validate_price(price: u64) -> Result<u64, ApiError> {
    if price == 0 {
        return Err(ApiError::bad_request("Price must be greater than zero"));
    }
    Ok(price)
}

fn validate_location(location: &str) -> Result<&str, ApiError> {
    let location = location.trim();
    if location.is_empty() {
        return Err(ApiError::bad_request("Location is required"));
    }
    Ok(location)
}

fn validate_description(description: &str) -> Result<(), ApiError> {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(ApiError::bad_request(
            "Description must be 1000 characters or fewer",
        ));
    }
    Ok(())
}

/// Agents own only their listings; admins own everything.
fn can_modify(user: &CurrentUser, record: &PropertyRecord) -> bool {
    user.role == Role::Admin || record.posted_by == user.id
}

/// List property listings, newest first, with optional filters.
#[utoipa::path(
    get,
    path = "/api/properties",
    params(PropertyQuery),
    responses((status = 200, description = "Listings", body = PropertyListResponse)),
    tag = "Properties"
)]
pub async fn list_properties(
    State(state): State<AppState>,
    Query(query): Query<PropertyQuery>,
) -> Result<Json<PropertyListResponse>, ApiError> {
    let filter = PropertyFilter {
        min_price: query.min_price,
        max_price: query.max_price,
        bedrooms: query.bedrooms,
        location: query.location,
    };

    let store = state.storage.read().await;
    let records = PropertyRepository::new(&store).list_filtered(&filter)?;

    let data: Vec<PropertyResponse> = records.iter().map(PropertyResponse::from).collect();
    Ok(Json(PropertyListResponse {
        success: true,
        count: data.len(),
        data,
    }))
}

/// Fetch a single listing.
#[utoipa::path(
    get,
    path = "/api/properties/{id}",
    params(("id" = String, Path, description = "Property id")),
    responses(
        (status = 200, description = "Listing", body = PropertyDetailResponse),
        (status = 404, description = "Unknown listing")
    ),
    tag = "Properties"
)]
pub async fn get_property(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PropertyDetailResponse>, ApiError> {
    let store = state.storage.read().await;
    let record = PropertyRepository::new(&store).get(&id)?;

    Ok(Json(PropertyDetailResponse {
        success: true,
        data: PropertyResponse::from(&record),
    }))
}

/// Create a listing. Agent or admin only.
#[utoipa::path(
    post,
    path = "/api/properties",
    request_body = CreatePropertyRequest,
    responses(
        (status = 201, description = "Listing created", body = PropertyDetailResponse),
        (status = 400, description = "Validation failure"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Buyer role")
    ),
    security(("bearer" = [])),
    tag = "Properties"
)]
pub async fn create_property(
    AgentOrAdmin(user): AgentOrAdmin,
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<CreatePropertyRequest>, ApiError>,
) -> Result<Response, ApiError> {
    let title = validate_title(&body.title)?.to_string();
    let price = validate_price(body.price)?;
    let location = validate_location(&body.location)?.to_string();
    if let Some(description) = &body.description {
        validate_description(description)?;
    }

    let mut record = PropertyRecord::new(title, price, location, &user.id);
    record.bedrooms = body.bedrooms;
    record.bathrooms = body.bathrooms;
    record.description = body.description;
    record.images = body.images.unwrap_or_default();

    {
        let store = state.storage.write().await;
        PropertyRepository::new(&store).create(&record)?;
    }

    info!(property_id = %record.id, user_id = %user.id, "listing created");

    let response = PropertyDetailResponse {
        success: true,
        data: PropertyResponse::from(&record),
    };
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// Partially update a listing. Owner agent or admin only.
#[utoipa::path(
    patch,
    path = "/api/properties/{id}",
    params(("id" = String, Path, description = "Property id")),
    request_body = UpdatePropertyRequest,
    responses(
        (status = 200, description = "Updated listing", body = PropertyDetailResponse),
        (status = 403, description = "Not the listing owner"),
        (status = 404, description = "Unknown listing")
    ),
    security(("bearer" = [])),
    tag = "Properties"
)]
pub async fn update_property(
    AgentOrAdmin(user): AgentOrAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Json(body), _): WithRejection<Json<UpdatePropertyRequest>, ApiError>,
) -> Result<Json<PropertyDetailResponse>, ApiError> {
    let store = state.storage.write().await;
    let repo = PropertyRepository::new(&store);
    let mut record = repo.get(&id)?;

    if !can_modify(&user, &record) {
        return Err(ApiError::forbidden("You can only modify your own listings"));
    }

    if let Some(title) = &body.title {
        record.title = validate_title(title)?.to_string();
    }
    if let Some(price) = body.price {
        record.price = validate_price(price)?;
    }
    if let Some(location) = &body.location {
        record.location = validate_location(location)?.to_string();
    }
    if let Some(description) = body.description {
        validate_description(&description)?;
        record.description = Some(description);
    }
    if body.bedrooms.is_some() {
        record.bedrooms = body.bedrooms;
    }
    if body.bathrooms.is_some() {
        record.bathrooms = body.bathrooms;
    }
    if let Some(images) = body.images {
        record.images = images;
    }
    record.updated_at = Utc::now();
    repo.update(&record)?;

    Ok(Json(PropertyDetailResponse {
        success: true,
        data: PropertyResponse::from(&record),
    }))
}

/// Delete a listing. Owner agent or admin only.
#[utoipa::path(
    delete,
    path = "/api/properties/{id}",
    params(("id" = String, Path, description = "Property id")),
    responses(
        (status = 200, description = "Listing deleted"),
        (status = 403, description = "Not the listing owner"),
        (status = 404, description = "Unknown listing")
    ),
    security(("bearer" = [])),
    tag = "Properties"
)]
pub async fn delete_property(
    AgentOrAdmin(user): AgentOrAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<crate::models::MessageResponse>, ApiError> {
    let store = state.storage.write().await;
    let repo = PropertyRepository::new(&store);
    let record = repo.get(&id)?;

    if !can_modify(&user, &record) {
        return Err(ApiError::forbidden("You can only modify your own listings"));
    }

    repo.delete(&id)?;
    drop(store);

    info!(property_id = %id, user_id = %user.id, "listing deleted");

    Ok(Json(crate::models::MessageResponse::ok(
        "Property deleted successfully",
    )))
}
