//! Contract tests for the authentication API
//!
//! POST /register, POST /login, POST /logout, GET /me, and the token
//! middleware guarding every non-public route.

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::http::{Method, StatusCode};
use helpers::*;
use serde_json::json;

#[actix_web::test]
async fn test_register_returns_user_role() {
    let srv = spawn_test_server().await;

    let (status, body) = register(&srv, "alicejohnson", DEFAULT_PASSWORD).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "username": "alicejohnson", "role": "user" }));
}

#[actix_web::test]
async fn test_register_ignores_requested_role() {
    let srv = spawn_test_server().await;

    let (status, body) = post_json(
        &srv,
        "/register",
        None,
        &json!({ "username": "mallory", "password": DEFAULT_PASSWORD, "role": "admin" }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "user");
}

#[actix_web::test]
async fn test_duplicate_registration_conflicts() {
    let srv = spawn_test_server().await;
    register(&srv, "bobsmith", DEFAULT_PASSWORD).await;

    let (status, body) = register(&srv, "bobsmith", DEFAULT_PASSWORD).await;
    assert_error(status, &body, StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_register_validation() {
    let srv = spawn_test_server().await;

    let (status, body) = register(&srv, "ab", DEFAULT_PASSWORD).await;
    assert_error(status, &body, StatusCode::BAD_REQUEST);

    let (status, body) = register(&srv, "carol", "short").await;
    assert_error(status, &body, StatusCode::BAD_REQUEST);

    let (status, body) = post_json(&srv, "/register", None, &json!({ "username": "carol" })).await;
    assert_error(status, &body, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_login_response_shape() {
    let srv = spawn_test_server().await;
    register(&srv, "alicejohnson", DEFAULT_PASSWORD).await;

    let (status, body) = login(&srv, "alicejohnson", DEFAULT_PASSWORD).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alicejohnson");
    assert_eq!(body["role"], "user");
    assert_eq!(body["token"].as_str().unwrap().len(), 64);
    assert!(body["expires_at"].is_string());
}

#[actix_web::test]
async fn test_bad_credentials_are_unauthorized() {
    let srv = spawn_test_server().await;
    register(&srv, "alicejohnson", DEFAULT_PASSWORD).await;

    let (status, body) = login(&srv, "alicejohnson", "wrong-password").await;
    assert_error(status, &body, StatusCode::UNAUTHORIZED);

    let (status, body) = login(&srv, "nobody", DEFAULT_PASSWORD).await;
    assert_error(status, &body, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_me_reflects_token_owner() {
    let srv = spawn_test_server().await;

    let token = admin_token(&srv).await;
    let (status, body) = get_json(&srv, "/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "username": ADMIN_USERNAME, "role": "admin" }));

    let token = user_token(&srv, "alicejohnson").await;
    let (_, body) = get_json(&srv, "/me", &token).await;
    assert_eq!(body["role"], "user");
}

#[actix_web::test]
async fn test_token_without_bearer_prefix() {
    let srv = spawn_test_server().await;
    let token = user_token(&srv, "alicejohnson").await;

    let response = srv
        .get("/me")
        .insert_header(("Authorization", token.as_str()))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_protected_routes_require_token() {
    let srv = spawn_test_server().await;

    for path in ["/me", "/revenue-entries", "/accounts", "/reports/summary"] {
        let (status, body) = call(&srv, Method::GET, path, None, None).await;
        assert_error(status, &body, StatusCode::UNAUTHORIZED);
    }

    let (status, body) = get_json(&srv, "/revenue-entries", "not-a-real-token").await;
    assert_error(status, &body, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_logout_revokes_token() {
    let srv = spawn_test_server().await;
    let token = user_token(&srv, "alicejohnson").await;

    let (status, body) = call(&srv, Method::POST, "/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, body) = get_json(&srv, "/me", &token).await;
    assert_error(status, &body, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_public_probes() {
    let srv = spawn_test_server().await;

    let (status, body) = call(&srv, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = call(&srv, Method::GET, "/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready"], true);
}

#[actix_web::test]
async fn test_request_id_is_echoed() {
    let srv = spawn_test_server().await;

    let response = srv
        .get("/health")
        .insert_header(("X-Request-ID", "trace-42"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.headers().get("x-request-id").unwrap(), "trace-42");
}
