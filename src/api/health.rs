// SPDX-License-Identifier: AGPL-3.0-or-later

//! Health endpoints for deployment probes.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub success: bool,
    pub status: &'static str,
    pub version: &'static str,
}

/// Readiness: storage must be reachable.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse),
        (status = 503, description = "Storage unavailable")
    ),
    tag = "Health"
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let store = state.storage.read().await;
    let storage_ok = store.paths().root().is_dir();
    drop(store);

    if storage_ok {
        (
            StatusCode::OK,
            Json(HealthResponse {
                success: true,
                status: "ok",
                version: env!("CARGO_PKG_VERSION"),
            }),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                success: false,
                status: "storage unavailable",
                version: env!("CARGO_PKG_VERSION"),
            }),
        )
    }
}

/// Liveness: the process is up and serving.
#[utoipa::path(
    get,
    path = "/health/live",
    responses((status = 200, description = "Process alive")),
    tag = "Health"
)]
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}
