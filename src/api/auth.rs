// SPDX-License-Identifier: AGPL-3.0-or-later

//! Authentication endpoints: registration, login, email verification, and
//! password recovery.
//!
//! Login failures for unknown emails and wrong passwords return the
//! identical 401 body so responses never reveal whether an address is
//! registered. The unverified-account 403 is the deliberate exception: it
//! carries a `resendEndpoint` hint so clients can offer a resend action.
//!
//! One-time tokens (verification, reset) are consumed under the store's
//! write lock: the check against the stored token and the clearing write
//! happen in one critical section, so the same link can never succeed twice.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::WithRejection;
use chrono::{Duration, Utc};
use tracing::{info, warn};

use crate::auth::{hash_password, verify_password, TokenPurpose};
use crate::error::ApiError;
use crate::models::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse, RegisterRequest,
    RegisterResponse, ResendVerificationRequest, ResetPasswordRequest, UnverifiedLoginResponse,
    UserResponse,
};
use crate::state::AppState;
use crate::storage::{UserRecord, UserRepository};

use super::validate::{normalize_email, validate_email, validate_name, validate_password};

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const INVALID_VERIFICATION_LINK: &str = "Invalid or expired verification link";
const INVALID_RESET_LINK: &str = "Invalid or expired reset link";
pub const RESEND_VERIFICATION_ENDPOINT: &str = "/api/auth/resend-verification";

/// bcrypt is CPU-bound; keep it off the async worker threads.
async fn hash_on_blocking_pool(password: String) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "password hashing task failed");
            ApiError::internal("Internal server error")
        })?
        .map_err(ApiError::from)
}

async fn verify_on_blocking_pool(password: String, hash: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "password verification task failed");
            ApiError::internal("Internal server error")
        })
}

/// Register a new account.
///
/// The account starts unverified with the buyer role; a verification link
/// is emailed. A delivery failure is logged but does not fail the
/// registration, since the link can be re-sent.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Validation failure"),
        (status = 409, description = "Email already registered")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<RegisterRequest>, ApiError>,
) -> Result<Response, ApiError> {
    let email = normalize_email(&body.email);
    validate_email(&email)?;
    validate_password(&body.password)?;
    let name = validate_name(&body.name)?.to_string();

    let password_hash = hash_on_blocking_pool(body.password).await?;

    let mut record = UserRecord::new(email, name, password_hash);
    let verification_token = state.tokens.issue(
        &record.id,
        &record.email,
        record.role,
        TokenPurpose::Verify,
    )?;
    record.verification_token = Some(verification_token.clone());
    record.verification_expires = Some(Utc::now() + Duration::hours(1));

    {
        let store = state.storage.write().await;
        let repo = UserRepository::new(&store);
        if repo.find_by_email(&record.email)?.is_some() {
            return Err(ApiError::conflict("Email already registered"));
        }
        repo.create(&record)?;
    }

    info!(user_id = %record.id, "account registered");

    if let Err(e) = state
        .mailer
        .send_verification(&record.email, &record.name, &verification_token)
        .await
    {
        warn!(user_id = %record.id, error = %e, "verification email failed to send");
    }

    let response = RegisterResponse {
        success: true,
        message: "Registration successful. Please check your email to verify your account."
            .to_string(),
        user: UserResponse::from(&record),
    };
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// Log in with email and password.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session token issued", body = LoginResponse),
        (status = 400, description = "Missing fields"),
        (status = 401, description = "Unknown email or wrong password"),
        (status = 403, description = "Account not verified", body = UnverifiedLoginResponse)
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> Result<Response, ApiError> {
    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    let email = normalize_email(&body.email);
    let record = {
        let store = state.storage.read().await;
        UserRepository::new(&store).find_by_email(&email)?
    };
    let Some(record) = record else {
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    };

    if !record.is_verified {
        let body = UnverifiedLoginResponse {
            success: false,
            error: "Please verify your email before logging in".to_string(),
            resend_endpoint: RESEND_VERIFICATION_ENDPOINT.to_string(),
        };
        return Ok((StatusCode::FORBIDDEN, Json(body)).into_response());
    }

    if !verify_on_blocking_pool(body.password, record.password_hash.clone()).await? {
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    let token = state
        .tokens
        .issue(&record.id, &record.email, record.role, TokenPurpose::Session)?;

    info!(user_id = %record.id, "login");

    let response = LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        token,
        user: UserResponse::from(&record),
    };
    Ok(Json(response).into_response())
}

/// Confirm an email address with the token from the verification link.
///
/// Single use: the token must carry a valid signature AND match the pending
/// token stored on the record AND be within its expiry. The stored token is
/// cleared on success.
#[utoipa::path(
    get,
    path = "/api/auth/confirm-email/{token}",
    params(("token" = String, Path, description = "Verification token")),
    responses(
        (status = 200, description = "Email verified", body = MessageResponse),
        (status = 400, description = "Invalid, expired, or already-used link")
    ),
    tag = "Auth"
)]
pub async fn confirm_email(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let claims = state
        .tokens
        .verify(&token, TokenPurpose::Verify)
        .map_err(|_| ApiError::bad_request(INVALID_VERIFICATION_LINK))?;

    let store = state.storage.write().await;
    let repo = UserRepository::new(&store);
    let mut record = repo
        .get(&claims.sub)
        .map_err(|_| ApiError::bad_request(INVALID_VERIFICATION_LINK))?;

    if !record.verification_token_matches(&token, Utc::now()) {
        return Err(ApiError::bad_request(INVALID_VERIFICATION_LINK));
    }

    record.is_verified = true;
    record.verification_token = None;
    record.verification_expires = None;
    record.updated_at = Utc::now();
    repo.update(&record)?;
    drop(store);

    info!(user_id = %record.id, "email verified");

    Ok(Json(MessageResponse::ok(
        "Email verified successfully. You can now log in.",
    )))
}

/// Re-send the verification email, rotating the pending token.
#[utoipa::path(
    post,
    path = "/api/auth/resend-verification",
    request_body = ResendVerificationRequest,
    responses(
        (status = 200, description = "Verification email sent", body = MessageResponse),
        (status = 400, description = "Account already verified"),
        (status = 404, description = "Unknown email")
    ),
    tag = "Auth"
)]
pub async fn resend_verification(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<ResendVerificationRequest>, ApiError>,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = normalize_email(&body.email);

    let (record, token) = {
        let store = state.storage.write().await;
        let repo = UserRepository::new(&store);
        let Some(mut record) = repo.find_by_email(&email)? else {
            return Err(ApiError::not_found("No account found with that email"));
        };
        if record.is_verified {
            return Err(ApiError::bad_request("Email is already verified"));
        }

        let token =
            state
                .tokens
                .issue(&record.id, &record.email, record.role, TokenPurpose::Verify)?;
        record.verification_token = Some(token.clone());
        record.verification_expires = Some(Utc::now() + Duration::hours(1));
        record.updated_at = Utc::now();
        repo.update(&record)?;
        (record, token)
    };

    if let Err(e) = state
        .mailer
        .send_verification(&record.email, &record.name, &token)
        .await
    {
        tracing::error!(user_id = %record.id, error = %e, "verification email failed to send");
        return Err(ApiError::internal("Failed to send verification email"));
    }

    Ok(Json(MessageResponse::ok(
        "Verification email sent. Please check your inbox.",
    )))
}

/// Start password recovery by emailing a short-lived reset link.
#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset email sent", body = MessageResponse),
        (status = 404, description = "Unknown email"),
        (status = 500, description = "Email delivery failure")
    ),
    tag = "Auth"
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<ForgotPasswordRequest>, ApiError>,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = normalize_email(&body.email);

    let (record, token) = {
        let store = state.storage.write().await;
        let repo = UserRepository::new(&store);
        let Some(mut record) = repo.find_by_email(&email)? else {
            return Err(ApiError::not_found("No account found with that email"));
        };

        let token =
            state
                .tokens
                .issue(&record.id, &record.email, record.role, TokenPurpose::Reset)?;
        record.reset_token = Some(token.clone());
        record.reset_expires = Some(Utc::now() + Duration::minutes(15));
        record.updated_at = Utc::now();
        repo.update(&record)?;
        (record, token)
    };

    if let Err(e) = state
        .mailer
        .send_password_reset(&record.email, &record.name, &token)
        .await
    {
        tracing::error!(user_id = %record.id, error = %e, "reset email failed to send");
        return Err(ApiError::internal("Failed to send password reset email"));
    }

    Ok(Json(MessageResponse::ok(
        "Password reset email sent. Please check your inbox.",
    )))
}

/// Complete password recovery with the token from the reset link.
#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "Invalid, expired, or already-used link")
    ),
    tag = "Auth"
)]
pub async fn reset_password(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<ResetPasswordRequest>, ApiError>,
) -> Result<Json<MessageResponse>, ApiError> {
    validate_password(&body.new_password)?;

    let claims = state
        .tokens
        .verify(&body.token, TokenPurpose::Reset)
        .map_err(|_| ApiError::bad_request(INVALID_RESET_LINK))?;

    let password_hash = hash_on_blocking_pool(body.new_password).await?;

    let store = state.storage.write().await;
    let repo = UserRepository::new(&store);
    let mut record = repo
        .get(&claims.sub)
        .map_err(|_| ApiError::bad_request(INVALID_RESET_LINK))?;

    if !record.reset_token_matches(&body.token, Utc::now()) {
        return Err(ApiError::bad_request(INVALID_RESET_LINK));
    }

    record.password_hash = password_hash;
    record.reset_token = None;
    record.reset_expires = None;
    record.updated_at = Utc::now();
    repo.update(&record)?;
    drop(store);

    info!(user_id = %record.id, "password reset");

    Ok(Json(MessageResponse::ok(
        "Password reset successfully. You can now log in.",
    )))
}
