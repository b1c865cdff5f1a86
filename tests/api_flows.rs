// SPDX-License-Identifier: AGPL-3.0-or-later

//! End-to-end flows exercised through the router.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use realty_server::api::router;
use realty_server::auth::Role;
use realty_server::config::{AppConfig, Environment};
use realty_server::state::AppState;
use realty_server::storage::{DocumentStore, StoragePaths, UserRecord, UserRepository};

const PASSWORD: &str = "Passw0rd";

fn test_app() -> (Router, AppState, TempDir) {
    let dir = TempDir::new().expect("temp dir");
    let mut store = DocumentStore::new(StoragePaths::new(dir.path()));
    store.initialize().expect("initialize storage");

    let config = AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        data_dir: dir.path().to_path_buf(),
        jwt_secret: "integration-test-secret".to_string(),
        client_url: "http://localhost:3000".to_string(),
        environment: Environment::Development,
        email_api_key: None,
        email_sender: "no-reply@realty.local".to_string(),
    };

    let state = AppState::new(store, config);
    (router(state.clone()), state, dir)
}

async fn seed_user(state: &AppState, email: &str, role: Role, verified: bool) -> UserRecord {
    let hash = bcrypt::hash(PASSWORD, 4).expect("hash");
    let mut record = UserRecord::new(email, "Seeded User", hash);
    record.role = role;
    record.is_verified = verified;

    let store = state.storage.write().await;
    UserRepository::new(&store).create(&record).expect("seed");
    record
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn authed_request(method: Method, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"));
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    builder.body(body).expect("request")
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

async fn login(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        json_request(
            Method::POST,
            "/api/auth/login",
            json!({"email": email, "password": password}),
        ),
    )
    .await
}

#[tokio::test]
async fn register_confirm_login_flow() {
    let (app, state, _dir) = test_app();

    // Register.
    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/auth/register",
            json!({"email": "Flow.User@Example.com", "password": PASSWORD, "name": "Flow User"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["email"], "flow.user@example.com");
    assert_eq!(body["user"]["isVerified"], false);
    assert!(body["user"].get("passwordHash").is_none());

    // Login before verification: 403 with resend hint.
    let (status, body) = login(&app, "flow.user@example.com", PASSWORD).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);
    assert_eq!(body["resendEndpoint"], "/api/auth/resend-verification");

    // Confirm with the pending token.
    let token = {
        let store = state.storage.read().await;
        UserRepository::new(&store)
            .find_by_email("flow.user@example.com")
            .expect("lookup")
            .expect("user")
            .verification_token
            .expect("pending token")
    };
    let (status, body) = send(
        &app,
        Request::builder()
            .uri(format!("/api/auth/confirm-email/{token}"))
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    // Confirming again fails: the link is single use.
    let (status, _) = send(
        &app,
        Request::builder()
            .uri(format!("/api/auth/confirm-email/{token}"))
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Login now succeeds and the session token works against /users/me.
    let (status, body) = login(&app, "flow.user@example.com", PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
    let session = body["token"].as_str().expect("session token").to_string();

    let (status, body) = send(
        &app,
        authed_request(Method::GET, "/api/users/me", &session, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "flow.user@example.com");
    assert_eq!(body["user"]["isVerified"], true);
}

#[tokio::test]
async fn login_failures_do_not_reveal_registered_emails() {
    let (app, state, _dir) = test_app();
    seed_user(&state, "known@x.com", Role::Buyer, true).await;

    let (unknown_status, unknown_body) = login(&app, "unknown@x.com", PASSWORD).await;
    let (wrong_status, wrong_body) = login(&app, "known@x.com", "WrongPass1").await;

    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_body, wrong_body);
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let (app, _state, _dir) = test_app();

    let (status, body) = send(
        &app,
        Request::builder()
            .uri("/api/users/me")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Authentication required. No token provided.");
}

#[tokio::test]
async fn wrong_content_type_gets_the_json_envelope() {
    let (app, _state, _dir) = test_app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("email=a@x.com"))
        .expect("request");
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Content-Type must be application/json");
}

#[tokio::test]
async fn admin_routes_are_gated_by_role() {
    let (app, state, _dir) = test_app();
    let buyer = seed_user(&state, "buyer@x.com", Role::Buyer, true).await;
    let admin = seed_user(&state, "admin@x.com", Role::Admin, true).await;

    let buyer_token = state
        .tokens
        .issue(
            &buyer.id,
            &buyer.email,
            buyer.role,
            realty_server::auth::TokenPurpose::Session,
        )
        .expect("token");
    let admin_token = state
        .tokens
        .issue(
            &admin.id,
            &admin.email,
            admin.role,
            realty_server::auth::TokenPurpose::Session,
        )
        .expect("token");

    let (status, _) = send(
        &app,
        authed_request(Method::GET, "/api/admin/dashboard", &buyer_token, None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        authed_request(Method::GET, "/api/admin/dashboard", &admin_token, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stats"]["totalUsers"], 2);
}

#[tokio::test]
async fn property_writes_require_agent_role() {
    let (app, state, _dir) = test_app();
    let buyer = seed_user(&state, "buyer@x.com", Role::Buyer, true).await;
    let agent = seed_user(&state, "agent@x.com", Role::Agent, true).await;

    let buyer_token = state
        .tokens
        .issue(
            &buyer.id,
            &buyer.email,
            buyer.role,
            realty_server::auth::TokenPurpose::Session,
        )
        .expect("token");
    let agent_token = state
        .tokens
        .issue(
            &agent.id,
            &agent.email,
            agent.role,
            realty_server::auth::TokenPurpose::Session,
        )
        .expect("token");

    let listing = json!({"title": "Cottage", "price": 250000, "location": "Lakeside"});

    let (status, _) = send(
        &app,
        authed_request(
            Method::POST,
            "/api/properties",
            &buyer_token,
            Some(listing.clone()),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        authed_request(Method::POST, "/api/properties", &agent_token, Some(listing)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["postedBy"], agent.id.as_str());

    // Reads stay public.
    let (status, body) = send(
        &app,
        Request::builder()
            .uri("/api/properties?minPrice=200000")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn body_token_works_when_no_cookie_or_header_is_set() {
    let (app, state, _dir) = test_app();
    let user = seed_user(&state, "a@x.com", Role::Buyer, true).await;
    let token = state
        .tokens
        .issue(
            &user.id,
            &user.email,
            user.role,
            realty_server::auth::TokenPurpose::Session,
        )
        .expect("token");

    let (status, body) = send(
        &app,
        json_request(
            Method::PATCH,
            "/api/users/me",
            json!({"token": token, "name": "Renamed Via Body"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "Renamed Via Body");
}

#[tokio::test]
async fn traversal_ids_in_urls_cannot_delete_credential_records() {
    let (app, state, _dir) = test_app();
    let admin = seed_user(&state, "admin@x.com", Role::Admin, true).await;
    let victim = seed_user(&state, "victim@x.com", Role::Buyer, true).await;

    let admin_token = state
        .tokens
        .issue(
            &admin.id,
            &admin.email,
            admin.role,
            realty_server::auth::TokenPurpose::Session,
        )
        .expect("token");

    // Encoded slashes decode into the path param after route matching.
    let uri = format!("/api/admin/properties/..%2Fusers%2F{}", victim.id);
    let (status, _) = send(
        &app,
        authed_request(Method::DELETE, &uri, &admin_token, None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let store = state.storage.read().await;
    assert!(UserRepository::new(&store).exists(&victim.id));
}

#[tokio::test]
async fn password_reset_flow_through_the_router() {
    let (app, state, _dir) = test_app();
    let user = seed_user(&state, "a@x.com", Role::Buyer, true).await;

    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/api/auth/forgot-password",
            json!({"email": "a@x.com"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let reset_token = {
        let store = state.storage.read().await;
        UserRepository::new(&store)
            .get(&user.id)
            .expect("user")
            .reset_token
            .expect("pending reset token")
    };

    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/api/auth/reset-password",
            json!({"token": reset_token, "newPassword": "NewPassw0rd"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Old password out, new password in.
    let (status, _) = login(&app, "a@x.com", PASSWORD).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = login(&app, "a@x.com", "NewPassw0rd").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn health_endpoints_respond() {
    let (app, _state, _dir) = test_app();

    let (status, body) = send(
        &app,
        Request::builder()
            .uri("/health")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, _) = send(
        &app,
        Request::builder()
            .uri("/health/live")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
